mod common;
mod control_plane;
mod sdk;
mod snapshot;
