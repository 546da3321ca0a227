//! Shaders, programs and uniforms.

use log::debug;

use crate::backend::{Backend, Name};
use crate::context::{Context, ContextError, ObjectRecord};
use crate::handle::{FragmentShaderHandle, ProgramHandle, ShaderHandle, VertexShaderHandle};
use crate::shader::{input_base_name, ActiveInput, InputInfo, Location, ProgramInputs, ShaderType};

impl<B> Context<B>
where
  B: Backend,
{
  pub fn create_program(&mut self) -> ProgramHandle {
    let name = self.backend.create_program();
    let handle = self.programs.insert(ObjectRecord { name });
    debug!("created program {:?}", handle);
    handle
  }

  pub fn create_vertex_shader(&mut self) -> VertexShaderHandle {
    let name = self.backend.create_shader(ShaderType::Vertex);
    let handle = self.vertex_shaders.insert(ObjectRecord { name });
    debug!("created vertex shader {:?}", handle);
    handle
  }

  pub fn create_fragment_shader(&mut self) -> FragmentShaderHandle {
    let name = self.backend.create_shader(ShaderType::Fragment);
    let handle = self.fragment_shaders.insert(ObjectRecord { name });
    debug!("created fragment shader {:?}", handle);
    handle
  }

  fn shader_name(&self, shader: ShaderHandle) -> Result<Name, ContextError> {
    let record = match shader {
      ShaderHandle::Vertex(handle) => self.vertex_shaders.get(handle),
      ShaderHandle::Fragment(handle) => self.fragment_shaders.get(handle),
    };

    record.map(|r| r.name).ok_or(ContextError::StaleHandle)
  }

  fn program_name(&self, program: ProgramHandle) -> Result<Name, ContextError> {
    self
      .programs
      .get(program)
      .map(|r| r.name)
      .ok_or(ContextError::StaleHandle)
  }

  pub fn set_shader_source(
    &mut self,
    shader: impl Into<ShaderHandle>,
    source: &str,
  ) -> Result<(), ContextError> {
    let name = self.shader_name(shader.into())?;
    self.backend.shader_source(name, source);
    Ok(())
  }

  /// Compile a shader; a failure carries the device compilation log.
  pub fn compile_shader(&mut self, shader: impl Into<ShaderHandle>) -> Result<(), ContextError> {
    let name = self.shader_name(shader.into())?;

    if self.backend.compile_shader(name) {
      Ok(())
    } else {
      Err(ContextError::ShaderCompilation(
        self.backend.shader_info_log(name),
      ))
    }
  }

  pub fn attach_shader(
    &mut self,
    program: ProgramHandle,
    shader: impl Into<ShaderHandle>,
  ) -> Result<(), ContextError> {
    let program = self.program_name(program)?;
    let shader = self.shader_name(shader.into())?;

    self.backend.attach_shader(program, shader);
    Ok(())
  }

  /// Link a program; a failure carries the device link log.
  pub fn link_program(&mut self, program: ProgramHandle) -> Result<(), ContextError> {
    let name = self.program_name(program)?;

    if self.backend.link_program(name) {
      Ok(())
    } else {
      Err(ContextError::ProgramLink(self.backend.program_info_log(name)))
    }
  }

  /// Use a program for the next draws; `None` uses no program.
  pub fn set_shader_program(&mut self, program: Option<ProgramHandle>) -> Result<(), ContextError> {
    let name = match program {
      Some(program) => self.program_name(program)?,
      None => 0,
    };

    if self.state.current_program.is_invalid(&name) {
      self.backend.use_program(name);
      self.state.current_program.set(name);
      self.debug_check();
    }

    Ok(())
  }

  /// Active attributes and uniforms of a linked program.
  ///
  /// Fails with [`ContextError::UnsupportedType`] on the first input whose device type has no
  /// engine counterpart.
  pub fn get_program_inputs(&mut self, program: ProgramHandle) -> Result<ProgramInputs, ContextError> {
    let name = self.program_name(program)?;
    let attributes = self.backend.active_attributes(name);
    let uniforms = self.backend.active_uniforms(name);

    Ok(ProgramInputs::new(
      type_inputs::<B>(attributes)?,
      type_inputs::<B>(uniforms)?,
    ))
  }

  pub fn set_uniform_ints(
    &mut self,
    location: Location,
    components: u8,
    values: &[i32],
  ) -> Result<(), ContextError> {
    check_uniform_shape(components, values.len())?;

    if location >= 0 {
      self.backend.uniform_ints(location, components, values);
      self.debug_check();
    }

    Ok(())
  }

  pub fn set_uniform_floats(
    &mut self,
    location: Location,
    components: u8,
    values: &[f32],
  ) -> Result<(), ContextError> {
    check_uniform_shape(components, values.len())?;

    if location >= 0 {
      self.backend.uniform_floats(location, components, values);
      self.debug_check();
    }

    Ok(())
  }

  /// Push column-major 4×4 matrices.
  pub fn set_uniform_matrix4(&mut self, location: Location, values: &[f32]) -> Result<(), ContextError> {
    if values.is_empty() || values.len() % 16 != 0 {
      return Err(ContextError::invalid_argument(format!(
        "{} floats do not make whole 4×4 matrices",
        values.len()
      )));
    }

    if location >= 0 {
      self.backend.uniform_matrices4(location, values);
      self.debug_check();
    }

    Ok(())
  }

  pub fn delete_program(&mut self, program: ProgramHandle) -> Result<(), ContextError> {
    let record = self
      .programs
      .remove(program)
      .ok_or(ContextError::StaleHandle)?;

    self.backend.delete_program(record.name);

    if !self.state.current_program.is_invalid(&record.name) {
      self.state.current_program.invalidate();
    }

    debug!("deleted program {:?}", program);
    self.debug_check();
    Ok(())
  }

  pub fn delete_vertex_shader(&mut self, shader: VertexShaderHandle) -> Result<(), ContextError> {
    let record = self
      .vertex_shaders
      .remove(shader)
      .ok_or(ContextError::StaleHandle)?;

    self.backend.delete_shader(record.name);
    debug!("deleted vertex shader {:?}", shader);
    Ok(())
  }

  pub fn delete_fragment_shader(&mut self, shader: FragmentShaderHandle) -> Result<(), ContextError> {
    let record = self
      .fragment_shaders
      .remove(shader)
      .ok_or(ContextError::StaleHandle)?;

    self.backend.delete_shader(record.name);
    debug!("deleted fragment shader {:?}", shader);
    Ok(())
  }
}

fn type_inputs<B>(inputs: Vec<ActiveInput>) -> Result<Vec<InputInfo>, ContextError>
where
  B: Backend,
{
  inputs
    .into_iter()
    .map(|input| match B::input_type_from_token(input.raw_type) {
      Some(ty) => Ok(InputInfo {
        name: input_base_name(&input.name).to_owned(),
        ty,
        location: input.location,
        size: input.size,
      }),

      None => Err(ContextError::UnsupportedType {
        name: input.name,
        token: input.raw_type,
      }),
    })
    .collect()
}

fn check_uniform_shape(components: u8, len: usize) -> Result<(), ContextError> {
  if !(1..=4).contains(&components) {
    return Err(ContextError::invalid_argument(format!(
      "uniform vectors have 1 to 4 components, not {}",
      components
    )));
  }

  if len == 0 || len % components as usize != 0 {
    return Err(ContextError::invalid_argument(format!(
      "{} values do not make whole {}-component vectors",
      len, components
    )));
  }

  Ok(())
}
