//! Render states.
//!
//! A [`States`] value is a snapshot of every fixed-function setting a draw needs: blending, depth
//! and stencil tests, triangle culling, scissor, the sampler state of each named sampler and the
//! render target. Build one from `States::default()` with the consuming `set_*` methods and hand it
//! to [`Context::apply_states`](crate::context::Context::apply_states).

use std::collections::BTreeMap;

use crate::blending::Mode;
use crate::depth_stencil::{CompareMode, StencilFunction, StencilOperation, StencilOperations};
use crate::face_culling::TriangleCulling;
use crate::handle::TextureHandle;
use crate::scissor::ScissorBox;
use crate::texture::SamplerState;

/// Render states.
#[derive(Clone, Debug, PartialEq)]
pub struct States {
  priority: f32,
  blending_mode: Mode,
  depth_mask: bool,
  depth_function: CompareMode,
  triangle_culling: TriangleCulling,
  stencil_function: StencilFunction,
  stencil_operations: StencilOperations,
  scissor_test: bool,
  scissor_box: ScissorBox,
  samplers: BTreeMap<String, SamplerState>,
  target: Option<TextureHandle>,
}

impl States {
  /// Drawn first.
  pub const PRIORITY_FIRST: f32 = 4000.;
  pub const PRIORITY_BACKGROUND: f32 = 3000.;
  pub const PRIORITY_OPAQUE: f32 = 2000.;
  pub const PRIORITY_TRANSPARENT: f32 = 1000.;
  /// Drawn last.
  pub const PRIORITY_LAST: f32 = 0.;

  /// Sort key of the draw; higher priorities are drawn first.
  pub fn set_priority(self, priority: f32) -> Self {
    States { priority, ..self }
  }

  pub fn priority(&self) -> f32 {
    self.priority
  }

  pub fn set_blending_mode(self, blending_mode: Mode) -> Self {
    States {
      blending_mode,
      ..self
    }
  }

  pub fn blending_mode(&self) -> Mode {
    self.blending_mode
  }

  pub fn set_depth_mask(self, depth_mask: bool) -> Self {
    States { depth_mask, ..self }
  }

  pub fn depth_mask(&self) -> bool {
    self.depth_mask
  }

  pub fn set_depth_function(self, depth_function: CompareMode) -> Self {
    States {
      depth_function,
      ..self
    }
  }

  pub fn depth_function(&self) -> CompareMode {
    self.depth_function
  }

  pub fn set_triangle_culling(self, triangle_culling: TriangleCulling) -> Self {
    States {
      triangle_culling,
      ..self
    }
  }

  pub fn triangle_culling(&self) -> TriangleCulling {
    self.triangle_culling
  }

  pub fn set_stencil_function(self, stencil_function: StencilFunction) -> Self {
    States {
      stencil_function,
      ..self
    }
  }

  pub fn stencil_function(&self) -> StencilFunction {
    self.stencil_function
  }

  pub fn set_stencil_operations(self, stencil_operations: StencilOperations) -> Self {
    States {
      stencil_operations,
      ..self
    }
  }

  pub fn stencil_operations(&self) -> StencilOperations {
    self.stencil_operations
  }

  pub fn set_scissor_test(self, scissor_test: bool) -> Self {
    States {
      scissor_test,
      ..self
    }
  }

  pub fn scissor_test(&self) -> bool {
    self.scissor_test
  }

  /// A box with a negative dimension covers the whole viewport.
  pub fn set_scissor_box(self, scissor_box: ScissorBox) -> Self {
    States {
      scissor_box,
      ..self
    }
  }

  pub fn scissor_box(&self) -> ScissorBox {
    self.scissor_box
  }

  /// Set the sampler state of the sampler uniform called `name`.
  pub fn set_sampler(mut self, name: impl Into<String>, sampler: SamplerState) -> Self {
    self.samplers.insert(name.into(), sampler);
    self
  }

  pub fn sampler(&self, name: &str) -> Option<SamplerState> {
    self.samplers.get(name).copied()
  }

  /// Sampler states, ordered by sampler name.
  pub fn samplers(&self) -> impl Iterator<Item = (&str, SamplerState)> {
    self.samplers.iter().map(|(name, s)| (name.as_str(), *s))
  }

  /// Render into `target`, or into the back buffer with `None`.
  pub fn set_target(self, target: impl Into<Option<TextureHandle>>) -> Self {
    States {
      target: target.into(),
      ..self
    }
  }

  pub fn target(&self) -> Option<TextureHandle> {
    self.target
  }
}

impl Default for States {
  /// The default `States`.
  ///
  ///   - `priority`: `States::PRIORITY_OPAQUE`
  ///   - `blending_mode`: `Mode::DEFAULT` (no blending)
  ///   - `depth_mask`: `true`, `depth_function`: `CompareMode::Less`
  ///   - `triangle_culling`: `TriangleCulling::Back`
  ///   - stencil: always pass, reference `0`, mask `1`, keep on every outcome
  ///   - `scissor_test`: `false`, `scissor_box`: `ScissorBox::FULL_VIEWPORT`
  ///   - no sampler, back buffer target
  fn default() -> Self {
    States {
      priority: States::PRIORITY_OPAQUE,
      blending_mode: Mode::DEFAULT,
      depth_mask: true,
      depth_function: CompareMode::Less,
      triangle_culling: TriangleCulling::Back,
      stencil_function: StencilFunction::new(CompareMode::Always, 0, 1),
      stencil_operations: StencilOperations::new(
        StencilOperation::Keep,
        StencilOperation::Keep,
        StencilOperation::Keep,
      ),
      scissor_test: false,
      scissor_box: ScissorBox::FULL_VIEWPORT,
      samplers: BTreeMap::new(),
      target: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::texture::{MipFilter, TextureFilter, WrapMode};

  #[test]
  fn setters_leave_other_fields_alone() {
    let states = States::default()
      .set_priority(States::PRIORITY_TRANSPARENT)
      .set_blending_mode(Mode::ALPHA)
      .set_depth_mask(false);

    assert_eq!(states.priority(), States::PRIORITY_TRANSPARENT);
    assert_eq!(states.blending_mode(), Mode::ALPHA);
    assert!(!states.depth_mask());
    assert_eq!(states.depth_function(), CompareMode::Less);
    assert_eq!(states.triangle_culling(), TriangleCulling::Back);
    assert!(states.target().is_none());
  }

  #[test]
  fn samplers_by_name() {
    let linear = SamplerState::new(WrapMode::Repeat, TextureFilter::Linear, MipFilter::Linear);
    let states = States::default()
      .set_sampler("uNormalMap", linear)
      .set_sampler("uDiffuseMap", SamplerState::default());

    assert_eq!(states.sampler("uNormalMap"), Some(linear));
    assert_eq!(states.sampler("uSpecularMap"), None);

    let names: Vec<_> = states.samplers().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["uDiffuseMap", "uNormalMap"]);
  }
}
