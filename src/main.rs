//! Showroom binary: load the OBJ files named on the command line, compose
//! the scene and run the viewer.
//!
//! The first file is the room itself; every following triple of files is one
//! exhibit (lowest, mid, highest detail) placed on the showroom floor.

use std::path::PathBuf;

use showroom::{
    app,
    data_structures::scene::{BundleHandle, compose_showroom},
    resources::AssetStore,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: showroom <room.obj> [<low.obj> <mid.obj> <high.obj>]...");
        std::process::exit(1);
    }

    let mut store = AssetStore::new();
    let handles: Vec<BundleHandle> = paths.iter().map(|path| store.load_obj(path)).collect();

    let scene = compose_showroom(&store, &handles);

    app::run(store, scene)
}
