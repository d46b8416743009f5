use log::LevelFilter;

/// Enable info level logging for the mesh_doctor crate only.
pub fn init_info() {
    env_logger::Builder::new().filter_module("mesh_doctor", LevelFilter::Info).init();
}

/// Enable debug level logging for the mesh_doctor crate only.
pub fn init_debug() {
    env_logger::Builder::new().filter_module("mesh_doctor", LevelFilter::Debug).init();
}
