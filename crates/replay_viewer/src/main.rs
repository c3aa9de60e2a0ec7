mod scene;
mod viewer;

use anyhow::anyhow;
use app::AppBuilder;
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use replay_camera::ReplayCameraPlugin;
use std::time::Duration;
use viewer::ReplayViewer;

const TICK_RATE: f64 = 60.0;

fn main() -> anyhow::Result<()> {
    let mut viewer = AppBuilder::<ReplayViewer>::new(env!("CARGO_PKG_VERSION"))
        .map_err(|err| anyhow!("failed to initialize replay viewer: {err}"))?
        .build_with_bevy(|mut app, ctx| {
            tracing::info!(version = ctx.version(), "starting replay viewer");

            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
                Duration::from_secs_f64(1.0 / TICK_RATE),
            )))
            .add_plugins(ReplayCameraPlugin::new(ctx.config_path()))
            .add_plugins(scene::ScriptedReplayPlugin);
            app
        });

    match viewer.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("replay viewer exited with code {code}")),
    }
}
