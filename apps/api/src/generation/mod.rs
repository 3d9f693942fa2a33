// Map generation pipeline: tile quota allocation, seeding, request normalization,
// orchestration of placement + coverage + color, and PNG output.
// CPU-bound work runs inside tokio::task::spawn_blocking (see handlers).

pub mod allocator;
pub mod encode;
pub mod generator;
pub mod handlers;
pub mod params;
pub mod seed;
