//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing an entity termination.
#[derive(Clone, Copy, Debug)]
pub struct Termination;

/// Marker type describing an estimated moment.
#[derive(Clone, Copy, Debug)]
pub struct Estimation;

/// Marker type describing a recorded change.
#[derive(Clone, Copy, Debug)]
pub struct Change;

/// Marker type describing an entity coming into effect.
#[derive(Clone, Copy, Debug)]
pub struct Commencement;
