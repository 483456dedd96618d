mod app;
mod clock;
mod config;
mod geom;
mod input;
mod jupiter;
mod logging;
mod model;
mod moons;
mod render;
mod roemer;
mod scheduler;
mod sim;
mod surface;
mod venus;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
