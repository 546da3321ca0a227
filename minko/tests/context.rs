//! State mirror behavior, checked against the calls recorded by the headless device.

use minko::backend::buffer::BufferTarget;
use minko::backend::headless::{Call, Headless};
use minko::backend::pipeline::{Capability, ClearMask};
use minko::backend::texture::TextureTarget;
use minko::blending::{Destination, Mode, Source};
use minko::context::RenderTarget;
use minko::depth_stencil::{CompareMode, StencilFunction, StencilOperation};
use minko::face_culling::{Face, TriangleCulling};
use minko::scissor::{ScissorBox, Viewport};
use minko::shader::{ActiveInput, InputType};
use minko::texture::{MipFilter, TextureFilter, TextureType, WrapMode};
use minko::{Context, ContextConfig, ContextError, States};

fn context_with(backend: Headless) -> Context<Headless> {
  let _ = env_logger::builder().is_test(true).try_init();

  let mut ctx = Context::new(backend, ContextConfig::default());
  ctx.backend_mut().clear_calls();
  ctx
}

fn context() -> Context<Headless> {
  context_with(Headless::new())
}

fn count(ctx: &Context<Headless>, pred: impl Fn(&Call) -> bool) -> usize {
  ctx.backend().count(pred)
}

#[test]
fn fresh_context_switches_tests_on() {
  let _ = env_logger::builder().is_test(true).try_init();
  let ctx = Context::new(Headless::new(), ContextConfig::default());

  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::Enable(Capability::Blend),
      Call::Enable(Capability::DepthTest),
      Call::Enable(Capability::StencilTest),
    ]
  );
  assert_eq!(ctx.render_target(), RenderTarget::BackBuffer);
  assert_eq!(ctx.current_viewport(), None);
}

#[test]
fn vertex_attribute_slots_are_clamped() {
  let ctx = context_with(Headless::new());
  assert_eq!(ctx.vertex_attribute_slots(), 8);

  let config = ContextConfig::default().vertex_attribute_slots(64);
  let ctx = Context::new(Headless::new(), config);
  assert_eq!(ctx.vertex_attribute_slots(), 32);
}

#[test]
fn blending_mode_is_diffed() {
  let mut ctx = context();

  ctx.set_blending_mode(Mode::ALPHA);
  ctx.set_blending_mode(Mode::ALPHA);
  ctx.set_blending_mode(Mode::ADDITIVE);

  let blend_calls: Vec<_> = ctx
    .backend()
    .calls()
    .iter()
    .filter(|c| matches!(c, Call::BlendFunc(..)))
    .cloned()
    .collect();

  assert_eq!(
    blend_calls,
    vec![
      Call::BlendFunc(Source::SrcAlpha, Destination::OneMinusSrcAlpha),
      Call::BlendFunc(Source::SrcAlpha, Destination::One),
    ]
  );
}

#[test]
fn blending_factors_share_the_mode_cache() {
  let mut ctx = context();

  ctx.set_blending_mode(Mode::ALPHA);
  ctx.set_blending_factors(Source::SrcAlpha, Destination::OneMinusSrcAlpha);

  assert_eq!(count(&ctx, |c| matches!(c, Call::BlendFunc(..))), 1);
}

#[test]
fn depth_test_sends_both_calls_on_change() {
  let mut ctx = context();

  ctx.set_depth_test(true, CompareMode::Less);
  ctx.set_depth_test(true, CompareMode::Less);
  assert_eq!(count(&ctx, |c| matches!(c, Call::DepthMask(_))), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::DepthFunc(_))), 1);

  ctx.set_depth_test(false, CompareMode::Less);
  assert_eq!(count(&ctx, |c| matches!(c, Call::DepthMask(_))), 2);
  assert_eq!(count(&ctx, |c| matches!(c, Call::DepthFunc(_))), 2);
}

#[test]
fn stencil_groups_are_diffed_independently() {
  let mut ctx = context();
  let keep = StencilOperation::Keep;

  ctx.set_stencil_test(CompareMode::Always, 0, 1, keep, keep, keep);
  ctx.set_stencil_test(CompareMode::Always, 0, 1, keep, keep, keep);
  assert_eq!(count(&ctx, |c| matches!(c, Call::StencilFunc(..))), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::StencilOp(..))), 1);

  ctx.set_stencil_test(CompareMode::Equal, 1, 1, keep, keep, keep);
  assert_eq!(count(&ctx, |c| matches!(c, Call::StencilFunc(..))), 2);
  assert_eq!(count(&ctx, |c| matches!(c, Call::StencilOp(..))), 1);

  ctx.set_stencil_test(CompareMode::Equal, 1, 1, keep, keep, StencilOperation::Replace);
  assert_eq!(count(&ctx, |c| matches!(c, Call::StencilFunc(..))), 2);
  assert_eq!(count(&ctx, |c| matches!(c, Call::StencilOp(..))), 2);
}

#[test]
fn culling_is_switched_on_when_leaving_none() {
  let mut ctx = context();

  ctx.set_triangle_culling(TriangleCulling::Back);
  ctx.set_triangle_culling(TriangleCulling::Back);
  ctx.set_triangle_culling(TriangleCulling::None);
  ctx.set_triangle_culling(TriangleCulling::Front);
  ctx.set_triangle_culling(TriangleCulling::Both);

  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::Enable(Capability::CullFace),
      Call::CullFace(Face::Back),
      Call::Disable(Capability::CullFace),
      Call::Enable(Capability::CullFace),
      Call::CullFace(Face::Front),
      Call::CullFace(Face::FrontAndBack),
    ]
  );
}

#[test]
fn full_viewport_scissor_follows_the_viewport() {
  let mut ctx = context();

  ctx.configure_viewport(0, 0, 800, 600);
  ctx.configure_viewport(0, 0, 800, 600);
  assert_eq!(count(&ctx, |c| matches!(c, Call::Viewport(..))), 1);

  ctx.set_scissor_test(true, ScissorBox::FULL_VIEWPORT);
  ctx.configure_viewport(0, 0, 400, 300);
  ctx.set_scissor_test(false, ScissorBox::FULL_VIEWPORT);

  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::Viewport(0, 0, 800, 600),
      Call::Enable(Capability::ScissorTest),
      Call::Scissor(0, 0, 800, 600),
      Call::Viewport(0, 0, 400, 300),
      Call::Scissor(0, 0, 400, 300),
      Call::Disable(Capability::ScissorTest),
    ]
  );
}

#[test]
fn full_viewport_scissor_waits_for_a_viewport() {
  let mut ctx = context();

  ctx.set_scissor_test(true, ScissorBox::FULL_VIEWPORT);
  assert!(ctx.backend().calls().is_empty());

  ctx.configure_viewport(10, 20, 30, 40);
  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::Viewport(10, 20, 30, 40),
      Call::Enable(Capability::ScissorTest),
      Call::Scissor(10, 20, 30, 40),
    ]
  );
}

#[test]
fn explicit_scissor_box() {
  let mut ctx = context();

  ctx.set_scissor_test(true, ScissorBox::new(1, 2, 3, 4));
  ctx.set_scissor_test(true, ScissorBox::new(1, 2, 3, 4));
  ctx.set_scissor_test(true, ScissorBox::new(5, 6, 7, 8));

  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::Enable(Capability::ScissorTest),
      Call::Scissor(1, 2, 3, 4),
      Call::Scissor(5, 6, 7, 8),
    ]
  );
}

#[test]
fn color_mask_is_diffed() {
  let mut ctx = context();

  ctx.set_color_mask(true);
  ctx.set_color_mask(true);
  ctx.set_color_mask(false);

  assert_eq!(
    ctx.backend().calls(),
    &[Call::ColorMask(true), Call::ColorMask(false)]
  );
}

#[test]
fn clear_values_are_cached() {
  let mut ctx = context();

  ctx.clear([0., 0., 0., 1.], 1., 0, ClearMask::ALL);
  ctx.clear([0., 0., 0., 1.], 1., 0, ClearMask::ALL);

  assert_eq!(count(&ctx, |c| matches!(c, Call::ClearColor(_))), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::ClearDepth(_))), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::ClearStencil(_))), 1);
  assert_eq!(count(&ctx, |c| *c == Call::Clear(ClearMask::ALL)), 2);
}

#[test]
fn depth_clear_turns_the_depth_mask_on() {
  let mut ctx = context();

  ctx.set_depth_test(false, CompareMode::LessEqual);
  ctx.backend_mut().clear_calls();

  ctx.clear([0.; 4], 1., 0, ClearMask::DEPTH);

  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::ClearDepth(1.),
      Call::DepthMask(true),
      Call::DepthFunc(CompareMode::LessEqual),
      Call::Clear(ClearMask::DEPTH),
    ]
  );
}

#[test]
fn read_pixels_checks_the_output_size() {
  let mut ctx = context();
  ctx.clear([1., 0., 0., 1.], 1., 0, ClearMask::COLOR);

  let mut pixels = vec![0; 2 * 2 * 4];
  ctx.read_pixels(0, 0, 2, 2, &mut pixels).unwrap();
  assert_eq!(&pixels[..4], &[255, 0, 0, 255]);

  let mut short = vec![0; 3];
  assert!(matches!(
    ctx.read_pixels(0, 0, 2, 2, &mut short),
    Err(ContextError::InvalidArgument(_))
  ));
}

#[test]
fn vertex_slots_are_diffed_and_gated() {
  let mut ctx = context();
  let vb = ctx.create_vertex_buffer(12).unwrap();

  ctx.set_vertex_buffer_at(0, Some(vb), 3, 6, 0).unwrap();
  ctx.set_vertex_buffer_at(0, Some(vb), 3, 6, 0).unwrap();
  ctx.set_vertex_buffer_at(1, Some(vb), 3, 6, 3).unwrap();
  ctx.set_vertex_buffer_at(1, None, 0, 0, 0).unwrap();
  ctx.set_vertex_buffer_at(1, None, 0, 0, 0).unwrap();

  assert_eq!(
    count(&ctx, |c| matches!(c, Call::BindBuffer(BufferTarget::Array, _))),
    1
  );
  assert_eq!(
    ctx
      .backend()
      .calls()
      .iter()
      .filter(|c| matches!(c, Call::VertexAttribPointer { .. }))
      .cloned()
      .collect::<Vec<_>>(),
    vec![
      Call::VertexAttribPointer {
        slot: 0,
        size: 3,
        stride: 24,
        offset: 0
      },
      Call::VertexAttribPointer {
        slot: 1,
        size: 3,
        stride: 24,
        offset: 12
      },
    ]
  );
  assert_eq!(count(&ctx, |c| matches!(c, Call::EnableVertexAttribArray(_))), 2);
  assert_eq!(
    count(&ctx, |c| *c == Call::DisableVertexAttribArray(1)),
    1
  );

  assert!(matches!(
    ctx.set_vertex_buffer_at(8, Some(vb), 3, 6, 0),
    Err(ContextError::InvalidArgument(_))
  ));
}

#[test]
fn texture_bindings_are_diffed_per_unit() {
  let mut ctx = context();
  let a = ctx
    .create_texture(TextureType::Texture2d, 4, 4, false, false, false)
    .unwrap();

  // creation binds the texture on the active unit
  assert_eq!(count(&ctx, |c| matches!(c, Call::BindTexture(..))), 1);

  ctx.set_texture_at(0, Some(a), Some(3)).unwrap();
  ctx.set_texture_at(0, Some(a), Some(3)).unwrap();
  assert_eq!(count(&ctx, |c| matches!(c, Call::BindTexture(..))), 1);

  // the sampler uniform is pushed every time
  assert_eq!(
    count(&ctx, |c| matches!(c, Call::UniformInts { location: 3, .. })),
    2
  );

  ctx.set_texture_at(2, Some(a), None).unwrap();
  assert_eq!(count(&ctx, |c| *c == Call::ActiveTexture(2)), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::BindTexture(..))), 2);
  assert_eq!(ctx.bound_texture_at(2), Some(a));

  ctx.set_texture_at(2, None, None).unwrap();
  assert_eq!(
    count(&ctx, |c| *c == Call::BindTexture(TextureTarget::Texture2d, 0)),
    1
  );
  assert_eq!(ctx.bound_texture_at(2), None);

  assert!(matches!(
    ctx.set_texture_at(8, Some(a), None),
    Err(ContextError::InvalidArgument(_))
  ));
}

#[test]
fn sampler_state_is_diffed_per_texture() {
  let mut ctx = context();
  let plain = ctx
    .create_texture(TextureType::Texture2d, 4, 4, false, false, false)
    .unwrap();
  let mipmapped = ctx
    .create_texture(TextureType::Texture2d, 4, 4, true, false, true)
    .unwrap();

  ctx.set_texture_at(0, Some(plain), None).unwrap();
  ctx.set_texture_at(1, Some(mipmapped), None).unwrap();
  ctx.backend_mut().clear_calls();

  // the default state is already set at creation
  ctx
    .set_sampler_state_at(0, WrapMode::Clamp, TextureFilter::Nearest, MipFilter::None)
    .unwrap();
  assert!(ctx.backend().calls().is_empty());

  // no mipmaps: the mip filter is forced to none
  ctx
    .set_sampler_state_at(0, WrapMode::Clamp, TextureFilter::Linear, MipFilter::Linear)
    .unwrap();
  assert_eq!(
    count(&ctx, |c| *c
      == Call::SetFilters(TextureTarget::Texture2d, TextureFilter::Linear, MipFilter::None)),
    1
  );
  assert_eq!(count(&ctx, |c| matches!(c, Call::SetWrapMode(..))), 0);

  ctx
    .set_sampler_state_at(1, WrapMode::Repeat, TextureFilter::Linear, MipFilter::Linear)
    .unwrap();
  assert_eq!(
    count(&ctx, |c| *c
      == Call::SetFilters(TextureTarget::Texture2d, TextureFilter::Linear, MipFilter::Linear)),
    1
  );
  assert_eq!(
    count(&ctx, |c| *c == Call::SetWrapMode(TextureTarget::Texture2d, WrapMode::Repeat)),
    1
  );

  assert_eq!(
    ctx.texture_sampler_state(plain).unwrap().map(|s| s.mip_filter),
    Some(MipFilter::None)
  );
}

#[test]
fn render_to_texture_saves_and_restores_the_viewport() {
  let mut ctx = context();
  let target = ctx
    .create_texture(TextureType::Texture2d, 256, 256, false, true, false)
    .unwrap();

  ctx.configure_viewport(0, 0, 800, 600);
  ctx.backend_mut().clear_calls();

  ctx.set_render_to_texture(target, true).unwrap();
  assert_eq!(ctx.render_target(), RenderTarget::Texture(target));
  assert_eq!(ctx.current_viewport(), Some(Viewport::new(0, 0, 256, 256)));

  // already the target: nothing to do
  ctx.set_render_to_texture(target, true).unwrap();
  assert_eq!(count(&ctx, |c| matches!(c, Call::BindFramebuffer(_))), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::Viewport(..))), 1);

  ctx.set_render_to_back_buffer();
  ctx.set_render_to_back_buffer();
  assert_eq!(ctx.render_target(), RenderTarget::BackBuffer);
  assert_eq!(ctx.current_viewport(), Some(Viewport::new(0, 0, 800, 600)));
  assert_eq!(count(&ctx, |c| *c == Call::BindFramebuffer(0)), 1);
}

#[test]
fn unconfigured_viewport_is_read_back_from_the_device() {
  let mut ctx = context_with(Headless::new().with_surface_size(1024, 768));
  let target = ctx
    .create_texture(TextureType::Texture2d, 64, 64, false, true, false)
    .unwrap();

  assert_eq!(ctx.current_viewport(), None);

  ctx.set_render_to_texture(target, true).unwrap();
  assert_eq!(ctx.current_viewport(), Some(Viewport::new(0, 0, 64, 64)));

  ctx.set_render_to_back_buffer();
  assert_eq!(ctx.current_viewport(), Some(Viewport::new(0, 0, 1024, 768)));
  assert_eq!(
    ctx.backend().calls().last(),
    Some(&Call::Viewport(0, 0, 1024, 768))
  );
}

#[test]
fn render_to_texture_toggles_depth_and_stencil() {
  let mut ctx = context();
  let target = ctx
    .create_texture(TextureType::Texture2d, 64, 64, false, true, false)
    .unwrap();
  ctx.backend_mut().clear_calls();

  ctx.set_render_to_texture(target, false).unwrap();
  ctx.set_render_to_texture(target, false).unwrap();
  ctx.set_render_to_texture(target, true).unwrap();

  let attachments: Vec<_> = ctx
    .backend()
    .calls()
    .iter()
    .filter_map(|c| match c {
      Call::FramebufferRenderbuffer(name) => Some(*name),
      _ => None,
    })
    .collect();

  assert_eq!(attachments.len(), 2);
  assert_eq!(attachments[0], 0);
  assert_ne!(attachments[1], 0);
}

#[test]
fn textures_without_framebuffer_cannot_be_targets() {
  let mut ctx = context();
  let plain = ctx
    .create_texture(TextureType::Texture2d, 64, 64, false, false, false)
    .unwrap();
  let cube = ctx
    .create_texture(TextureType::CubeTexture, 64, 64, false, true, false)
    .unwrap();

  assert_eq!(
    ctx.set_render_to_texture(plain, true),
    Err(ContextError::UnsupportedTarget)
  );
  assert_eq!(
    ctx.set_render_to_texture(cube, true),
    Err(ContextError::UnsupportedTarget)
  );
  assert_eq!(ctx.render_target(), RenderTarget::BackBuffer);
}

#[test]
fn incomplete_framebuffer_deletes_the_texture() {
  let mut ctx = context();
  ctx.backend_mut().set_framebuffer_complete(false);

  assert_eq!(
    ctx.create_texture(TextureType::Texture2d, 64, 64, false, true, false),
    Err(ContextError::IncompleteFramebuffer)
  );
  assert_eq!(count(&ctx, |c| matches!(c, Call::DeleteTexture(_))), 1);
  assert_eq!(count(&ctx, |c| matches!(c, Call::DeleteFramebuffer(_))), 1);
}

#[test]
fn deleting_the_target_goes_back_to_the_back_buffer() {
  let mut ctx = context();
  let target = ctx
    .create_texture(TextureType::Texture2d, 32, 32, false, true, false)
    .unwrap();

  ctx.configure_viewport(0, 0, 640, 480);
  ctx.set_render_to_texture(target, true).unwrap();
  ctx.delete_texture(target).unwrap();

  assert_eq!(ctx.render_target(), RenderTarget::BackBuffer);
  assert_eq!(ctx.current_viewport(), Some(Viewport::new(0, 0, 640, 480)));
  assert!(!ctx.is_live(target));
}

#[test]
fn draws() {
  let mut ctx = context();
  let ib = ctx.create_index_buffer(6).unwrap();
  ctx.backend_mut().clear_calls();

  ctx.draw_triangles(ib, 0, 2).unwrap();
  ctx.draw_triangles_arrays(0, 1);
  ctx.draw_triangles_arrays(3, 1);

  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::DrawElements {
        count: 6,
        first_index: 0
      },
      Call::BindBuffer(BufferTarget::ElementArray, 0),
      Call::DrawArrays { first: 0, count: 3 },
      Call::DrawArrays { first: 3, count: 3 },
    ]
  );

  ctx.delete_index_buffer(ib).unwrap();
  assert_eq!(ctx.draw_triangles(ib, 0, 2), Err(ContextError::StaleHandle));
}

#[test]
fn indexed_draws_stay_within_the_index_buffer() {
  let mut ctx = context();
  let ib = ctx.create_index_buffer(6).unwrap();
  ctx.backend_mut().clear_calls();

  ctx.draw_triangles(ib, 3, 1).unwrap();

  assert!(matches!(
    ctx.draw_triangles(ib, 4, 1),
    Err(ContextError::InvalidArgument(_))
  ));
  assert!(matches!(
    ctx.draw_triangles(ib, 0, 3),
    Err(ContextError::InvalidArgument(_))
  ));
  assert!(matches!(
    ctx.draw_triangles(ib, 0, u32::MAX),
    Err(ContextError::InvalidArgument(_))
  ));

  assert_eq!(count(&ctx, |c| matches!(c, Call::DrawElements { .. })), 1);
}

#[test]
fn shaders_compile_and_link() {
  let mut ctx = context();
  let program = ctx.create_program();
  let vs = ctx.create_vertex_shader();
  let fs = ctx.create_fragment_shader();

  ctx.set_shader_source(vs, "void main() {}").unwrap();
  ctx.set_shader_source(fs, "void main() {}").unwrap();
  ctx.compile_shader(vs).unwrap();
  ctx.compile_shader(fs).unwrap();
  ctx.attach_shader(program, vs).unwrap();
  ctx.attach_shader(program, fs).unwrap();
  ctx.link_program(program).unwrap();

  ctx.set_shader_program(Some(program)).unwrap();
  ctx.set_shader_program(Some(program)).unwrap();
  assert_eq!(count(&ctx, |c| matches!(c, Call::UseProgram(_))), 1);

  ctx.delete_program(program).unwrap();
  assert_eq!(ctx.set_shader_program(Some(program)), Err(ContextError::StaleHandle));

  // the deleted program is no longer believed in use
  ctx.set_shader_program(None).unwrap();
  assert_eq!(count(&ctx, |c| *c == Call::UseProgram(0)), 1);
}

#[test]
fn compilation_failure_carries_the_log() {
  let mut ctx = context();
  let fs = ctx.create_fragment_shader();

  ctx.set_shader_source(fs, "#error broken").unwrap();

  match ctx.compile_shader(fs) {
    Err(ContextError::ShaderCompilation(log)) => assert!(log.contains("#error")),
    other => panic!("unexpected result: {:?}", other),
  }

  let program = ctx.create_program();
  ctx.attach_shader(program, fs).unwrap();
  assert!(matches!(
    ctx.link_program(program),
    Err(ContextError::ProgramLink(_))
  ));
}

#[test]
fn program_inputs_are_typed() {
  let mut ctx = context();

  ctx.backend_mut().set_active_inputs(
    vec![ActiveInput {
      name: "aPosition".to_owned(),
      raw_type: Headless::input_token(InputType::Float3),
      size: 1,
      location: 0,
    }],
    vec![
      ActiveInput {
        name: "uLights[0]".to_owned(),
        raw_type: Headless::input_token(InputType::Float4),
        size: 4,
        location: 2,
      },
      ActiveInput {
        name: "uDiffuseMap".to_owned(),
        raw_type: Headless::input_token(InputType::Sampler2d),
        size: 1,
        location: 3,
      },
    ],
  );

  let program = ctx.create_program();
  let vs = ctx.create_vertex_shader();
  ctx.set_shader_source(vs, "void main() {}").unwrap();
  ctx.compile_shader(vs).unwrap();
  ctx.attach_shader(program, vs).unwrap();
  ctx.link_program(program).unwrap();

  let inputs = ctx.get_program_inputs(program).unwrap();

  assert_eq!(inputs.attribute("aPosition").map(|i| i.ty), Some(InputType::Float3));
  assert_eq!(inputs.uniform("uLights").map(|i| (i.size, i.location)), Some((4, 2)));
  assert_eq!(
    inputs.samplers().map(|i| i.name.as_str()).collect::<Vec<_>>(),
    vec!["uDiffuseMap"]
  );
}

#[test]
fn unknown_input_types_are_reported() {
  let mut ctx = context();

  ctx.backend_mut().set_active_inputs(
    Vec::new(),
    vec![ActiveInput {
      name: "uShadowMap".to_owned(),
      raw_type: 0x8B62,
      size: 1,
      location: 0,
    }],
  );

  let program = ctx.create_program();
  let vs = ctx.create_vertex_shader();
  ctx.set_shader_source(vs, "void main() {}").unwrap();
  ctx.compile_shader(vs).unwrap();
  ctx.attach_shader(program, vs).unwrap();
  ctx.link_program(program).unwrap();

  assert_eq!(
    ctx.get_program_inputs(program),
    Err(ContextError::UnsupportedType {
      name: "uShadowMap".to_owned(),
      token: 0x8B62
    })
  );
}

#[test]
fn uniform_shapes_are_checked() {
  let mut ctx = context();

  assert!(matches!(
    ctx.set_uniform_floats(2, 3, &[1., 2.]),
    Err(ContextError::InvalidArgument(_))
  ));
  assert!(matches!(
    ctx.set_uniform_ints(2, 5, &[1; 5]),
    Err(ContextError::InvalidArgument(_))
  ));
  assert!(matches!(
    ctx.set_uniform_matrix4(0, &[0.; 15]),
    Err(ContextError::InvalidArgument(_))
  ));

  // inactive uniforms are silently skipped
  ctx.set_uniform_floats(-1, 3, &[1., 2., 3.]).unwrap();
  assert!(ctx.backend().calls().is_empty());

  ctx.set_uniform_floats(4, 2, &[1., 2., 3., 4.]).unwrap();
  ctx.set_uniform_matrix4(5, &[0.; 32]).unwrap();
  assert_eq!(
    ctx.backend().calls(),
    &[
      Call::UniformFloats {
        location: 4,
        components: 2,
        values: vec![1., 2., 3., 4.]
      },
      Call::UniformMatrices4 {
        location: 5,
        count: 2
      },
    ]
  );
}

#[test]
fn available_formats_skip_unknown_tokens() {
  use minko::texture::TextureFormat;

  let backend = Headless::new()
    .with_compressed_formats(&[TextureFormat::RgbaDxt5, TextureFormat::RgbEtc1])
    .with_compressed_tokens(&[0xBEEF]);
  let mut ctx = context_with(backend);

  assert_eq!(
    ctx.available_texture_formats(),
    &[
      TextureFormat::Rgb,
      TextureFormat::Rgba,
      TextureFormat::RgbaDxt5,
      TextureFormat::RgbEtc1,
    ]
  );
}

#[test]
fn extensions_are_looked_up() {
  let mut ctx = context_with(Headless::new().with_extensions(&["GL_OES_packed_depth_stencil"]));

  assert!(ctx.supports_extension("GL_OES_packed_depth_stencil"));
  assert!(!ctx.supports_extension("GL_EXT_texture_filter_anisotropic"));
}

#[test]
fn device_errors_are_drained_not_propagated() {
  let mut ctx = context();

  ctx.backend_mut().inject_error(0x0502, "invalid operation");
  ctx.backend_mut().inject_error(0x0501, "invalid value");

  assert!(ctx.check_for_errors());
  assert!(!ctx.check_for_errors());
}

#[test]
fn states_are_applied_through_the_mirror() {
  let mut ctx = context();
  let states = States::default()
    .set_blending_mode(Mode::ADDITIVE)
    .set_depth_mask(false)
    .set_triangle_culling(TriangleCulling::None)
    .set_stencil_function(StencilFunction::new(CompareMode::Equal, 1, 0xFF));

  ctx.apply_states(&states).unwrap();
  assert_eq!(
    count(&ctx, |c| *c == Call::BlendFunc(Source::SrcAlpha, Destination::One)),
    1
  );
  assert_eq!(count(&ctx, |c| *c == Call::DepthMask(false)), 1);
  assert_eq!(count(&ctx, |c| *c == Call::Disable(Capability::CullFace)), 1);
  assert_eq!(
    count(&ctx, |c| *c == Call::StencilFunc(CompareMode::Equal, 1, 0xFF)),
    1
  );

  ctx.backend_mut().clear_calls();
  ctx.apply_states(&states).unwrap();
  assert!(ctx.backend().calls().is_empty());
}

#[test]
fn states_can_target_a_texture() {
  let mut ctx = context();
  let target = ctx
    .create_texture(TextureType::Texture2d, 128, 128, false, true, false)
    .unwrap();

  ctx.apply_states(&States::default().set_target(target)).unwrap();
  assert_eq!(ctx.render_target(), RenderTarget::Texture(target));

  ctx.apply_states(&States::default()).unwrap();
  assert_eq!(ctx.render_target(), RenderTarget::BackBuffer);
}
