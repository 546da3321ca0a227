//! Shader backend interface.

use crate::backend::Name;
use crate::shader::{ActiveInput, InputType, Location, ShaderType};

/// Shader backend.
pub trait Shader {
  fn create_shader(&mut self, ty: ShaderType) -> Name;

  fn shader_source(&mut self, shader: Name, source: &str);

  /// Compile a shader; `false` if the compilation failed.
  fn compile_shader(&mut self, shader: Name) -> bool;

  fn shader_info_log(&mut self, shader: Name) -> String;

  fn delete_shader(&mut self, shader: Name);

  fn create_program(&mut self) -> Name;

  fn attach_shader(&mut self, program: Name, shader: Name);

  /// Link a program; `false` if the link failed.
  fn link_program(&mut self, program: Name) -> bool;

  fn program_info_log(&mut self, program: Name) -> String;

  fn delete_program(&mut self, program: Name);

  fn use_program(&mut self, program: Name);

  fn active_attributes(&mut self, program: Name) -> Vec<ActiveInput>;

  fn active_uniforms(&mut self, program: Name) -> Vec<ActiveInput>;

  /// Map a raw variable type token to an engine input type, if the backend knows it.
  fn input_type_from_token(token: u32) -> Option<InputType>
  where
    Self: Sized;

  /// Push `values.len() / components` integer vectors to the program in use.
  fn uniform_ints(&mut self, location: Location, components: u8, values: &[i32]);

  /// Push `values.len() / components` float vectors to the program in use.
  fn uniform_floats(&mut self, location: Location, components: u8, values: &[f32]);

  /// Push `values.len() / 16` column-major 4×4 matrices to the program in use.
  fn uniform_matrices4(&mut self, location: Location, values: &[f32]);
}
