//! Shader stages and program introspection.
//!
//! Once a program is linked, the context can be asked for its [`ProgramInputs`]: the table of
//! active attributes and uniforms, with their location, array size and [`InputType`]. The
//! material-binding layer uses that table to push values.

/// A uniform or attribute location, as reported by the device.
pub type Location = i32;

/// Shader stage.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum ShaderType {
  Vertex,
  Fragment,
}

/// Engine-side type of a program input.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum InputType {
  Int1,
  Int2,
  Int3,
  Int4,
  Bool1,
  Bool2,
  Bool3,
  Bool4,
  Float1,
  Float2,
  Float3,
  Float4,
  /// 3×3 matrix.
  Float9,
  /// 4×4 matrix.
  Float16,
  Sampler2d,
  SamplerCube,
}

impl InputType {
  /// Every input type.
  pub const ALL: [InputType; 16] = [
    InputType::Int1,
    InputType::Int2,
    InputType::Int3,
    InputType::Int4,
    InputType::Bool1,
    InputType::Bool2,
    InputType::Bool3,
    InputType::Bool4,
    InputType::Float1,
    InputType::Float2,
    InputType::Float3,
    InputType::Float4,
    InputType::Float9,
    InputType::Float16,
    InputType::Sampler2d,
    InputType::SamplerCube,
  ];

  /// Whether the input is a texture sampler.
  pub fn is_sampler(self) -> bool {
    matches!(self, InputType::Sampler2d | InputType::SamplerCube)
  }
}

/// One active variable as reported by the device, before type mapping.
///
/// `raw_type` is the backend’s own type token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveInput {
  pub name: String,
  pub raw_type: u32,
  pub size: u32,
  pub location: Location,
}

/// One program input, typed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputInfo {
  pub name: String,
  pub ty: InputType,
  pub location: Location,
  /// Array size; `1` for non-array inputs.
  pub size: u32,
}

/// Active attributes and uniforms of a linked program.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgramInputs {
  attributes: Vec<InputInfo>,
  uniforms: Vec<InputInfo>,
}

impl ProgramInputs {
  pub(crate) fn new(attributes: Vec<InputInfo>, uniforms: Vec<InputInfo>) -> Self {
    ProgramInputs {
      attributes,
      uniforms,
    }
  }

  pub fn attributes(&self) -> &[InputInfo] {
    &self.attributes
  }

  pub fn uniforms(&self) -> &[InputInfo] {
    &self.uniforms
  }

  pub fn attribute(&self, name: &str) -> Option<&InputInfo> {
    self.attributes.iter().find(|input| input.name == name)
  }

  pub fn uniform(&self, name: &str) -> Option<&InputInfo> {
    self.uniforms.iter().find(|input| input.name == name)
  }

  /// Uniforms that are texture samplers, in declaration order.
  pub fn samplers(&self) -> impl Iterator<Item = &InputInfo> {
    self.uniforms.iter().filter(|input| input.ty.is_sampler())
  }
}

/// Strip the `[0]` suffix devices append to array uniforms.
pub(crate) fn input_base_name(name: &str) -> &str {
  name.strip_suffix("[0]").unwrap_or(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn array_suffix_is_stripped() {
    assert_eq!(input_base_name("uLights[0]"), "uLights");
    assert_eq!(input_base_name("uColor"), "uColor");
  }

  #[test]
  fn samplers_are_filtered() {
    let uniform = |name: &str, ty| InputInfo {
      name: name.to_owned(),
      ty,
      location: 0,
      size: 1,
    };
    let inputs = ProgramInputs::new(
      Vec::new(),
      vec![
        uniform("uDiffuseMap", InputType::Sampler2d),
        uniform("uColor", InputType::Float4),
        uniform("uEnvMap", InputType::SamplerCube),
      ],
    );

    let names: Vec<_> = inputs.samplers().map(|input| input.name.as_str()).collect();
    assert_eq!(names, vec!["uDiffuseMap", "uEnvMap"]);
    assert_eq!(inputs.uniform("uColor").map(|u| u.ty), Some(InputType::Float4));
    assert!(inputs.attribute("aPosition").is_none());
  }
}
