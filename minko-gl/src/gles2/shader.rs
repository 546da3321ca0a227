//! OpenGL ES 2 shader and program implementation.

use std::ffi::CString;
use std::ptr::{null, null_mut};

use gl::types::*;
use minko::backend::shader::Shader;
use minko::backend::Name;
use minko::shader::{ActiveInput, InputType, Location, ShaderType};

use crate::gles2::Gles2;

fn shader_type_to_glenum(ty: ShaderType) -> GLenum {
  match ty {
    ShaderType::Vertex => gl::VERTEX_SHADER,
    ShaderType::Fragment => gl::FRAGMENT_SHADER,
  }
}

pub(crate) fn glenum_to_input_type(token: GLenum) -> Option<InputType> {
  match token {
    gl::INT => Some(InputType::Int1),
    gl::INT_VEC2 => Some(InputType::Int2),
    gl::INT_VEC3 => Some(InputType::Int3),
    gl::INT_VEC4 => Some(InputType::Int4),
    gl::BOOL => Some(InputType::Bool1),
    gl::BOOL_VEC2 => Some(InputType::Bool2),
    gl::BOOL_VEC3 => Some(InputType::Bool3),
    gl::BOOL_VEC4 => Some(InputType::Bool4),
    gl::FLOAT => Some(InputType::Float1),
    gl::FLOAT_VEC2 => Some(InputType::Float2),
    gl::FLOAT_VEC3 => Some(InputType::Float3),
    gl::FLOAT_VEC4 => Some(InputType::Float4),
    gl::FLOAT_MAT3 => Some(InputType::Float9),
    gl::FLOAT_MAT4 => Some(InputType::Float16),
    gl::SAMPLER_2D => Some(InputType::Sampler2d),
    gl::SAMPLER_CUBE => Some(InputType::SamplerCube),
    _ => None,
  }
}

// Turn a driver log into a string, dropping the terminating NUL.
fn log_to_string(mut log: Vec<u8>) -> String {
  while log.last() == Some(&0) {
    log.pop();
  }

  String::from_utf8_lossy(&log).into_owned()
}

fn c_string(s: &str) -> CString {
  CString::new(s.replace('\0', "")).unwrap_or_default()
}

#[derive(Clone, Copy)]
enum Interface {
  Attributes,
  Uniforms,
}

fn active_inputs(program: Name, interface: Interface) -> Vec<ActiveInput> {
  let (count_param, max_len_param) = match interface {
    Interface::Attributes => (gl::ACTIVE_ATTRIBUTES, gl::ACTIVE_ATTRIBUTE_MAX_LENGTH),
    Interface::Uniforms => (gl::ACTIVE_UNIFORMS, gl::ACTIVE_UNIFORM_MAX_LENGTH),
  };

  let mut count: GLint = 0;
  let mut max_len: GLint = 0;

  unsafe {
    gl::GetProgramiv(program, count_param, &mut count);
    gl::GetProgramiv(program, max_len_param, &mut max_len);
  }

  let mut inputs = Vec::with_capacity(count.max(0) as usize);

  for index in 0..count.max(0) as GLuint {
    let mut name = vec![0u8; max_len.max(1) as usize];
    let mut len: GLsizei = 0;
    let mut size: GLint = 0;
    let mut ty: GLenum = 0;

    unsafe {
      match interface {
        Interface::Attributes => gl::GetActiveAttrib(
          program,
          index,
          max_len,
          &mut len,
          &mut size,
          &mut ty,
          name.as_mut_ptr() as *mut GLchar,
        ),

        Interface::Uniforms => gl::GetActiveUniform(
          program,
          index,
          max_len,
          &mut len,
          &mut size,
          &mut ty,
          name.as_mut_ptr() as *mut GLchar,
        ),
      }
    }

    name.truncate(len.max(0) as usize);
    let name = log_to_string(name);
    let c_name = c_string(&name);

    let location = unsafe {
      match interface {
        Interface::Attributes => gl::GetAttribLocation(program, c_name.as_ptr()),
        Interface::Uniforms => gl::GetUniformLocation(program, c_name.as_ptr()),
      }
    };

    inputs.push(ActiveInput {
      name,
      raw_type: ty,
      size: size.max(0) as u32,
      location,
    });
  }

  inputs
}

impl Shader for Gles2 {
  fn create_shader(&mut self, ty: ShaderType) -> Name {
    unsafe { gl::CreateShader(shader_type_to_glenum(ty)) }
  }

  fn shader_source(&mut self, shader: Name, source: &str) {
    let c_src = c_string(source);

    unsafe {
      gl::ShaderSource(shader, 1, [c_src.as_ptr()].as_ptr(), null());
    }
  }

  fn compile_shader(&mut self, shader: Name) -> bool {
    let mut compiled: GLint = gl::FALSE.into();

    unsafe {
      gl::CompileShader(shader);
      gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut compiled);
    }

    compiled == gl::TRUE.into()
  }

  fn shader_info_log(&mut self, shader: Name) -> String {
    let mut log_len: GLint = 0;

    unsafe {
      gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_len);
    }

    let mut log = vec![0u8; log_len.max(0) as usize];

    unsafe {
      gl::GetShaderInfoLog(shader, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);
    }

    log_to_string(log)
  }

  fn delete_shader(&mut self, shader: Name) {
    unsafe {
      gl::DeleteShader(shader);
    }
  }

  fn create_program(&mut self) -> Name {
    unsafe { gl::CreateProgram() }
  }

  fn attach_shader(&mut self, program: Name, shader: Name) {
    unsafe {
      gl::AttachShader(program, shader);
    }
  }

  fn link_program(&mut self, program: Name) -> bool {
    let mut linked: GLint = gl::FALSE.into();

    unsafe {
      gl::LinkProgram(program);
      gl::GetProgramiv(program, gl::LINK_STATUS, &mut linked);
    }

    linked == gl::TRUE.into()
  }

  fn program_info_log(&mut self, program: Name) -> String {
    let mut log_len: GLint = 0;

    unsafe {
      gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_len);
    }

    let mut log = vec![0u8; log_len.max(0) as usize];

    unsafe {
      gl::GetProgramInfoLog(program, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);
    }

    log_to_string(log)
  }

  fn delete_program(&mut self, program: Name) {
    unsafe {
      gl::DeleteProgram(program);
    }
  }

  fn use_program(&mut self, program: Name) {
    unsafe {
      gl::UseProgram(program);
    }
  }

  fn active_attributes(&mut self, program: Name) -> Vec<ActiveInput> {
    active_inputs(program, Interface::Attributes)
  }

  fn active_uniforms(&mut self, program: Name) -> Vec<ActiveInput> {
    active_inputs(program, Interface::Uniforms)
  }

  fn input_type_from_token(token: u32) -> Option<InputType> {
    glenum_to_input_type(token)
  }

  fn uniform_ints(&mut self, location: Location, components: u8, values: &[i32]) {
    let count = (values.len() / components as usize) as GLsizei;
    let values = values.as_ptr();

    unsafe {
      match components {
        1 => gl::Uniform1iv(location, count, values),
        2 => gl::Uniform2iv(location, count, values),
        3 => gl::Uniform3iv(location, count, values),
        _ => gl::Uniform4iv(location, count, values),
      }
    }
  }

  fn uniform_floats(&mut self, location: Location, components: u8, values: &[f32]) {
    let count = (values.len() / components as usize) as GLsizei;
    let values = values.as_ptr();

    unsafe {
      match components {
        1 => gl::Uniform1fv(location, count, values),
        2 => gl::Uniform2fv(location, count, values),
        3 => gl::Uniform3fv(location, count, values),
        _ => gl::Uniform4fv(location, count, values),
      }
    }
  }

  fn uniform_matrices4(&mut self, location: Location, values: &[f32]) {
    unsafe {
      gl::UniformMatrix4fv(
        location,
        (values.len() / 16) as GLsizei,
        gl::FALSE,
        values.as_ptr(),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sampler_tokens() {
    assert_eq!(glenum_to_input_type(gl::SAMPLER_2D), Some(InputType::Sampler2d));
    assert_eq!(glenum_to_input_type(gl::SAMPLER_CUBE), Some(InputType::SamplerCube));
    assert_eq!(glenum_to_input_type(gl::FLOAT_MAT2), None);
  }

  #[test]
  fn driver_logs_lose_their_nul() {
    assert_eq!(log_to_string(b"0:1: error\0".to_vec()), "0:1: error");
    assert_eq!(log_to_string(Vec::new()), "");
  }
}
