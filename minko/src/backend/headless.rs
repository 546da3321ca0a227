//! Headless backend.
//!
//! [`Headless`] is a software stand-in for a device. It hands out object names the way a driver
//! does (recycling freed names first), records every call it receives in a [`Call`] log and lets
//! the caller script the few answers a device gives back: compressed formats, extensions, active
//! program inputs, error flags, compilation failures.
//!
//! It is what the crate’s own tests run against, and it is handy to validate rendering code on
//! machines without a GPU.

use std::collections::{HashMap, VecDeque};

use crate::backend::buffer::{Buffer, BufferTarget, BufferUsage};
use crate::backend::framebuffer::Framebuffer;
use crate::backend::pipeline::{Capability, ClearMask, Pipeline};
use crate::backend::shader::Shader;
use crate::backend::texture::{ImageTarget, Texture, TextureTarget};
use crate::backend::{Backend, DriverError, Name};
use crate::blending::{Destination, Source};
use crate::depth_stencil::{CompareMode, StencilOperation};
use crate::face_culling::Face;
use crate::shader::{ActiveInput, InputType, Location, ShaderType};
use crate::texture::{MipFilter, TextureFilter, TextureFormat, WrapMode};

const FORMAT_TOKEN_BASE: u32 = 0x1000;
const INPUT_TOKEN_BASE: u32 = 0x2000;

/// A call received by the headless device.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
  GenBuffer(Name),
  DeleteBuffer(Name),
  BindBuffer(BufferTarget, Name),
  BufferStorage {
    target: BufferTarget,
    size: usize,
    usage: BufferUsage,
  },
  BufferSubData {
    target: BufferTarget,
    offset: usize,
    size: usize,
  },
  GenTexture(Name),
  DeleteTexture(Name),
  ActiveTexture(u32),
  BindTexture(TextureTarget, Name),
  TexImage {
    target: ImageTarget,
    level: u32,
    width: u32,
    height: u32,
    with_texels: bool,
  },
  CompressedTexImage {
    target: ImageTarget,
    level: u32,
    format: TextureFormat,
    width: u32,
    height: u32,
    size: usize,
  },
  GenerateMipmap(TextureTarget),
  SetWrapMode(TextureTarget, WrapMode),
  SetFilters(TextureTarget, TextureFilter, MipFilter),
  GenFramebuffer(Name),
  DeleteFramebuffer(Name),
  BindFramebuffer(Name),
  FramebufferTexture(ImageTarget, Name),
  GenRenderbuffer(Name),
  DeleteRenderbuffer(Name),
  BindRenderbuffer(Name),
  RenderbufferStorage {
    width: u32,
    height: u32,
  },
  FramebufferRenderbuffer(Name),
  ReadPixels {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
  },
  CreateShader(ShaderType, Name),
  ShaderSource(Name),
  CompileShader(Name),
  DeleteShader(Name),
  CreateProgram(Name),
  AttachShader(Name, Name),
  LinkProgram(Name),
  DeleteProgram(Name),
  UseProgram(Name),
  UniformInts {
    location: Location,
    components: u8,
    values: Vec<i32>,
  },
  UniformFloats {
    location: Location,
    components: u8,
    values: Vec<f32>,
  },
  UniformMatrices4 {
    location: Location,
    count: usize,
  },
  Enable(Capability),
  Disable(Capability),
  BlendFunc(Source, Destination),
  DepthMask(bool),
  DepthFunc(CompareMode),
  StencilFunc(CompareMode, i32, u32),
  StencilOp(StencilOperation, StencilOperation, StencilOperation),
  CullFace(Face),
  Scissor(i32, i32, i32, i32),
  Viewport(i32, i32, i32, i32),
  ColorMask(bool),
  ClearColor([f32; 4]),
  ClearDepth(f32),
  ClearStencil(i32),
  Clear(ClearMask),
  VertexAttribPointer {
    slot: u32,
    size: u32,
    stride: usize,
    offset: usize,
  },
  EnableVertexAttribArray(u32),
  DisableVertexAttribArray(u32),
  DrawElements {
    count: u32,
    first_index: u32,
  },
  DrawArrays {
    first: u32,
    count: u32,
  },
}

// Driver-like name allocation: freed names are recycled first, most recent first.
#[derive(Debug, Default)]
struct Names {
  last: Name,
  free: Vec<Name>,
}

impl Names {
  fn gen(&mut self) -> Name {
    match self.free.pop() {
      Some(name) => name,
      None => {
        self.last += 1;
        self.last
      }
    }
  }

  fn release(&mut self, name: Name) {
    if name != 0 && !self.free.contains(&name) {
      self.free.push(name);
    }
  }
}

#[derive(Debug, Default)]
struct ShaderObject {
  source: String,
  compiled: bool,
  log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
  shaders: Vec<Name>,
  attributes: Vec<ActiveInput>,
  uniforms: Vec<ActiveInput>,
  log: String,
}

/// The headless device.
#[derive(Debug)]
pub struct Headless {
  calls: Vec<Call>,
  buffers: Names,
  textures: Names,
  framebuffers: Names,
  renderbuffers: Names,
  // shaders and programs share one namespace, as on GL devices
  objects: Names,
  shaders: HashMap<Name, ShaderObject>,
  programs: HashMap<Name, ProgramObject>,
  compressed_formats: Vec<u32>,
  extensions: Vec<String>,
  max_texture_size: u32,
  active_attributes: Vec<ActiveInput>,
  active_uniforms: Vec<ActiveInput>,
  errors: VecDeque<DriverError>,
  framebuffer_complete: bool,
  clear_color: [f32; 4],
  viewport: [i32; 4],
}

impl Headless {
  /// A device with no compressed formats, no extensions and 4096 texels max texture side.
  pub fn new() -> Self {
    Headless {
      calls: Vec::new(),
      buffers: Names::default(),
      textures: Names::default(),
      framebuffers: Names::default(),
      renderbuffers: Names::default(),
      objects: Names::default(),
      shaders: HashMap::new(),
      programs: HashMap::new(),
      compressed_formats: Vec::new(),
      extensions: Vec::new(),
      max_texture_size: 4096,
      active_attributes: Vec::new(),
      active_uniforms: Vec::new(),
      errors: VecDeque::new(),
      framebuffer_complete: true,
      clear_color: [0.; 4],
      viewport: [0; 4],
    }
  }

  /// Token the headless device uses for a compressed format.
  pub fn format_token(format: TextureFormat) -> u32 {
    let index = TextureFormat::ALL
      .iter()
      .position(|f| *f == format)
      .unwrap_or(0);

    FORMAT_TOKEN_BASE + index as u32
  }

  /// Token the headless device uses for a program input type.
  pub fn input_token(ty: InputType) -> u32 {
    let index = InputType::ALL.iter().position(|t| *t == ty).unwrap_or(0);

    INPUT_TOKEN_BASE + index as u32
  }

  /// Advertise compressed formats.
  pub fn with_compressed_formats(mut self, formats: &[TextureFormat]) -> Self {
    self
      .compressed_formats
      .extend(formats.iter().map(|f| Self::format_token(*f)));
    self
  }

  /// Advertise raw compressed-format tokens, known or not.
  pub fn with_compressed_tokens(mut self, tokens: &[u32]) -> Self {
    self.compressed_formats.extend_from_slice(tokens);
    self
  }

  pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
    self
      .extensions
      .extend(extensions.iter().map(|e| (*e).to_owned()));
    self
  }

  pub fn with_max_texture_size(mut self, size: u32) -> Self {
    self.max_texture_size = size;
    self
  }

  /// Size of the surface the device draws to, which is also its initial viewport.
  pub fn with_surface_size(mut self, width: i32, height: i32) -> Self {
    self.viewport = [0, 0, width, height];
    self
  }

  /// Active inputs reported by every program linked from now on.
  pub fn set_active_inputs(&mut self, attributes: Vec<ActiveInput>, uniforms: Vec<ActiveInput>) {
    self.active_attributes = attributes;
    self.active_uniforms = uniforms;
  }

  /// Raise an error flag, popped by the next [`Pipeline::get_error`].
  pub fn inject_error(&mut self, code: u32, description: &'static str) {
    self.errors.push_back(DriverError { code, description });
  }

  /// Whether framebuffers report themselves complete.
  pub fn set_framebuffer_complete(&mut self, complete: bool) {
    self.framebuffer_complete = complete;
  }

  /// Every call received so far.
  pub fn calls(&self) -> &[Call] {
    &self.calls
  }

  /// Forget the recorded calls.
  pub fn clear_calls(&mut self) {
    self.calls.clear();
  }

  /// Number of recorded calls matching a predicate.
  pub fn count<F>(&self, pred: F) -> usize
  where
    F: Fn(&Call) -> bool,
  {
    self.calls.iter().filter(|call| pred(call)).count()
  }

  fn record(&mut self, call: Call) {
    self.calls.push(call);
  }
}

impl Default for Headless {
  fn default() -> Self {
    Headless::new()
  }
}

impl Buffer for Headless {
  fn gen_buffer(&mut self) -> Name {
    let name = self.buffers.gen();
    self.record(Call::GenBuffer(name));
    name
  }

  fn delete_buffer(&mut self, buffer: Name) {
    self.buffers.release(buffer);
    self.record(Call::DeleteBuffer(buffer));
  }

  fn bind_buffer(&mut self, target: BufferTarget, buffer: Name) {
    self.record(Call::BindBuffer(target, buffer));
  }

  fn buffer_storage(&mut self, target: BufferTarget, size: usize, usage: BufferUsage) {
    self.record(Call::BufferStorage {
      target,
      size,
      usage,
    });
  }

  fn buffer_sub_data_f32(&mut self, target: BufferTarget, offset: usize, data: &[f32]) {
    self.record(Call::BufferSubData {
      target,
      offset,
      size: data.len() * 4,
    });
  }

  fn buffer_sub_data_u16(&mut self, target: BufferTarget, offset: usize, data: &[u16]) {
    self.record(Call::BufferSubData {
      target,
      offset,
      size: data.len() * 2,
    });
  }
}

impl Texture for Headless {
  fn gen_texture(&mut self) -> Name {
    let name = self.textures.gen();
    self.record(Call::GenTexture(name));
    name
  }

  fn delete_texture(&mut self, texture: Name) {
    self.textures.release(texture);
    self.record(Call::DeleteTexture(texture));
  }

  fn active_texture(&mut self, unit: u32) {
    self.record(Call::ActiveTexture(unit));
  }

  fn bind_texture(&mut self, target: TextureTarget, texture: Name) {
    self.record(Call::BindTexture(target, texture));
  }

  fn tex_image(
    &mut self,
    target: ImageTarget,
    level: u32,
    width: u32,
    height: u32,
    texels: Option<&[u8]>,
  ) {
    self.record(Call::TexImage {
      target,
      level,
      width,
      height,
      with_texels: texels.is_some(),
    });
  }

  fn compressed_tex_image(
    &mut self,
    target: ImageTarget,
    level: u32,
    format: TextureFormat,
    width: u32,
    height: u32,
    data: &[u8],
  ) {
    self.record(Call::CompressedTexImage {
      target,
      level,
      format,
      width,
      height,
      size: data.len(),
    });
  }

  fn generate_mipmap(&mut self, target: TextureTarget) {
    self.record(Call::GenerateMipmap(target));
  }

  fn set_wrap_mode(&mut self, target: TextureTarget, wrap_mode: WrapMode) {
    self.record(Call::SetWrapMode(target, wrap_mode));
  }

  fn set_filters(&mut self, target: TextureTarget, filter: TextureFilter, mip_filter: MipFilter) {
    self.record(Call::SetFilters(target, filter, mip_filter));
  }

  fn max_texture_size(&mut self) -> u32 {
    self.max_texture_size
  }

  fn compressed_texture_formats(&mut self) -> Vec<u32> {
    self.compressed_formats.clone()
  }

  fn texture_format_from_token(token: u32) -> Option<TextureFormat> {
    token
      .checked_sub(FORMAT_TOKEN_BASE)
      .and_then(|index| TextureFormat::ALL.get(index as usize))
      .copied()
  }
}

impl Framebuffer for Headless {
  fn gen_framebuffer(&mut self) -> Name {
    let name = self.framebuffers.gen();
    self.record(Call::GenFramebuffer(name));
    name
  }

  fn delete_framebuffer(&mut self, framebuffer: Name) {
    self.framebuffers.release(framebuffer);
    self.record(Call::DeleteFramebuffer(framebuffer));
  }

  fn bind_framebuffer(&mut self, framebuffer: Name) {
    self.record(Call::BindFramebuffer(framebuffer));
  }

  fn framebuffer_texture(&mut self, target: ImageTarget, texture: Name) {
    self.record(Call::FramebufferTexture(target, texture));
  }

  fn gen_renderbuffer(&mut self) -> Name {
    let name = self.renderbuffers.gen();
    self.record(Call::GenRenderbuffer(name));
    name
  }

  fn delete_renderbuffer(&mut self, renderbuffer: Name) {
    self.renderbuffers.release(renderbuffer);
    self.record(Call::DeleteRenderbuffer(renderbuffer));
  }

  fn bind_renderbuffer(&mut self, renderbuffer: Name) {
    self.record(Call::BindRenderbuffer(renderbuffer));
  }

  fn renderbuffer_depth_stencil_storage(&mut self, width: u32, height: u32) {
    self.record(Call::RenderbufferStorage { width, height });
  }

  fn framebuffer_depth_stencil_renderbuffer(&mut self, renderbuffer: Name) {
    self.record(Call::FramebufferRenderbuffer(renderbuffer));
  }

  fn framebuffer_complete(&mut self) -> bool {
    self.framebuffer_complete
  }

  fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32, out: &mut [u8]) {
    // every pixel reads back as the last clear color
    let texel = self.clear_color.map(|c| (c.max(0.).min(1.) * 255.).round() as u8);

    for pixel in out.chunks_exact_mut(4) {
      pixel.copy_from_slice(&texel);
    }

    self.record(Call::ReadPixels {
      x,
      y,
      width,
      height,
    });
  }
}

impl Shader for Headless {
  fn create_shader(&mut self, ty: ShaderType) -> Name {
    let name = self.objects.gen();
    self.shaders.insert(name, ShaderObject::default());
    self.record(Call::CreateShader(ty, name));
    name
  }

  fn shader_source(&mut self, shader: Name, source: &str) {
    if let Some(object) = self.shaders.get_mut(&shader) {
      object.source = source.to_owned();
    }

    self.record(Call::ShaderSource(shader));
  }

  fn compile_shader(&mut self, shader: Name) -> bool {
    self.record(Call::CompileShader(shader));

    match self.shaders.get_mut(&shader) {
      Some(object) => {
        // `#error` is the only way to fail a headless compilation
        object.compiled = !object.source.contains("#error");
        object.log = if object.compiled {
          String::new()
        } else {
          "0:1: '#error' : headless compilation failure".to_owned()
        };
        object.compiled
      }

      None => false,
    }
  }

  fn shader_info_log(&mut self, shader: Name) -> String {
    self
      .shaders
      .get(&shader)
      .map(|object| object.log.clone())
      .unwrap_or_default()
  }

  fn delete_shader(&mut self, shader: Name) {
    self.shaders.remove(&shader);
    self.objects.release(shader);
    self.record(Call::DeleteShader(shader));
  }

  fn create_program(&mut self) -> Name {
    let name = self.objects.gen();
    self.programs.insert(name, ProgramObject::default());
    self.record(Call::CreateProgram(name));
    name
  }

  fn attach_shader(&mut self, program: Name, shader: Name) {
    if let Some(object) = self.programs.get_mut(&program) {
      object.shaders.push(shader);
    }

    self.record(Call::AttachShader(program, shader));
  }

  fn link_program(&mut self, program: Name) -> bool {
    self.record(Call::LinkProgram(program));

    let shaders = &self.shaders;
    let attributes = self.active_attributes.clone();
    let uniforms = self.active_uniforms.clone();

    match self.programs.get_mut(&program) {
      Some(object) => {
        let linked = !object.shaders.is_empty()
          && object
            .shaders
            .iter()
            .all(|s| shaders.get(s).map_or(false, |shader| shader.compiled));

        if linked {
          object.attributes = attributes;
          object.uniforms = uniforms;
          object.log.clear();
        } else {
          object.log = "headless link failure: missing or uncompiled shader".to_owned();
        }

        linked
      }

      None => false,
    }
  }

  fn program_info_log(&mut self, program: Name) -> String {
    self
      .programs
      .get(&program)
      .map(|object| object.log.clone())
      .unwrap_or_default()
  }

  fn delete_program(&mut self, program: Name) {
    self.programs.remove(&program);
    self.objects.release(program);
    self.record(Call::DeleteProgram(program));
  }

  fn use_program(&mut self, program: Name) {
    self.record(Call::UseProgram(program));
  }

  fn active_attributes(&mut self, program: Name) -> Vec<ActiveInput> {
    self
      .programs
      .get(&program)
      .map(|object| object.attributes.clone())
      .unwrap_or_default()
  }

  fn active_uniforms(&mut self, program: Name) -> Vec<ActiveInput> {
    self
      .programs
      .get(&program)
      .map(|object| object.uniforms.clone())
      .unwrap_or_default()
  }

  fn input_type_from_token(token: u32) -> Option<InputType> {
    token
      .checked_sub(INPUT_TOKEN_BASE)
      .and_then(|index| InputType::ALL.get(index as usize))
      .copied()
  }

  fn uniform_ints(&mut self, location: Location, components: u8, values: &[i32]) {
    self.record(Call::UniformInts {
      location,
      components,
      values: values.to_vec(),
    });
  }

  fn uniform_floats(&mut self, location: Location, components: u8, values: &[f32]) {
    self.record(Call::UniformFloats {
      location,
      components,
      values: values.to_vec(),
    });
  }

  fn uniform_matrices4(&mut self, location: Location, values: &[f32]) {
    self.record(Call::UniformMatrices4 {
      location,
      count: values.len() / 16,
    });
  }
}

impl Pipeline for Headless {
  fn enable(&mut self, capability: Capability) {
    self.record(Call::Enable(capability));
  }

  fn disable(&mut self, capability: Capability) {
    self.record(Call::Disable(capability));
  }

  fn blend_func(&mut self, source: Source, destination: Destination) {
    self.record(Call::BlendFunc(source, destination));
  }

  fn depth_mask(&mut self, mask: bool) {
    self.record(Call::DepthMask(mask));
  }

  fn depth_func(&mut self, func: CompareMode) {
    self.record(Call::DepthFunc(func));
  }

  fn stencil_func(&mut self, func: CompareMode, reference: i32, mask: u32) {
    self.record(Call::StencilFunc(func, reference, mask));
  }

  fn stencil_op(&mut self, fail: StencilOperation, z_fail: StencilOperation, z_pass: StencilOperation) {
    self.record(Call::StencilOp(fail, z_fail, z_pass));
  }

  fn cull_face(&mut self, face: Face) {
    self.record(Call::CullFace(face));
  }

  fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
    self.record(Call::Scissor(x, y, width, height));
  }

  fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
    self.viewport = [x, y, width, height];
    self.record(Call::Viewport(x, y, width, height));
  }

  fn get_viewport(&mut self) -> [i32; 4] {
    self.viewport
  }

  fn color_mask(&mut self, mask: bool) {
    self.record(Call::ColorMask(mask));
  }

  fn clear_color(&mut self, color: [f32; 4]) {
    self.clear_color = color;
    self.record(Call::ClearColor(color));
  }

  fn clear_depth(&mut self, depth: f32) {
    self.record(Call::ClearDepth(depth));
  }

  fn clear_stencil(&mut self, stencil: i32) {
    self.record(Call::ClearStencil(stencil));
  }

  fn clear(&mut self, mask: ClearMask) {
    self.record(Call::Clear(mask));
  }

  fn vertex_attrib_pointer(&mut self, slot: u32, size: u32, stride: usize, offset: usize) {
    self.record(Call::VertexAttribPointer {
      slot,
      size,
      stride,
      offset,
    });
  }

  fn enable_vertex_attrib_array(&mut self, slot: u32) {
    self.record(Call::EnableVertexAttribArray(slot));
  }

  fn disable_vertex_attrib_array(&mut self, slot: u32) {
    self.record(Call::DisableVertexAttribArray(slot));
  }

  fn draw_elements(&mut self, count: u32, first_index: u32) {
    self.record(Call::DrawElements { count, first_index });
  }

  fn draw_arrays(&mut self, first: u32, count: u32) {
    self.record(Call::DrawArrays { first, count });
  }

  fn get_error(&mut self) -> Option<DriverError> {
    self.errors.pop_front()
  }

  fn extensions(&mut self) -> Vec<String> {
    self.extensions.clone()
  }
}

impl Backend for Headless {
  fn backend_name(&self) -> &'static str {
    "headless"
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_are_recycled() {
    let mut device = Headless::new();
    let a = device.gen_texture();
    let b = device.gen_texture();

    device.delete_texture(a);

    assert_eq!(device.gen_texture(), a);
    assert_ne!(a, b);
  }

  #[test]
  fn tokens_map_back() {
    for format in TextureFormat::ALL.iter() {
      assert_eq!(
        Headless::texture_format_from_token(Headless::format_token(*format)),
        Some(*format)
      );
    }

    for ty in InputType::ALL.iter() {
      assert_eq!(Headless::input_type_from_token(Headless::input_token(*ty)), Some(*ty));
    }

    assert_eq!(Headless::texture_format_from_token(0xDEAD), None);
    assert_eq!(Headless::input_type_from_token(0x10), None);
  }

  #[test]
  fn error_compilation() {
    let mut device = Headless::new();
    let vs = device.create_shader(ShaderType::Vertex);

    device.shader_source(vs, "#error nope");
    assert!(!device.compile_shader(vs));
    assert!(!device.shader_info_log(vs).is_empty());

    let program = device.create_program();
    device.attach_shader(program, vs);
    assert!(!device.link_program(program));
  }
}
