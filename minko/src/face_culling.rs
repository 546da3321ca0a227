//! Face culling is the operation of removing triangles if they’re facing the screen in a specific
//! direction.

/// Which triangles to cull.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum TriangleCulling {
  /// Do not cull anything; face culling is disabled on the device.
  None,
  /// Cull the back side only.
  Back,
  /// Cull the front side only.
  Front,
  /// Always cull any triangle.
  Both,
}

impl TriangleCulling {
  /// The device face to cull, if culling is on at all.
  pub fn face(self) -> Option<Face> {
    match self {
      TriangleCulling::None => None,
      TriangleCulling::Back => Some(Face::Back),
      TriangleCulling::Front => Some(Face::Front),
      TriangleCulling::Both => Some(Face::FrontAndBack),
    }
  }
}

impl Default for TriangleCulling {
  fn default() -> Self {
    TriangleCulling::Back
  }
}

/// Side handed to the device when culling is enabled.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Face {
  /// Front facing triangles.
  Front,
  /// Back facing triangles.
  Back,
  /// Both.
  FrontAndBack,
}
