//! Application bootstrap: directory layout, the settings file location and
//! the `tracing` subscriber shared by every binary of the project.

use paths::PathContext;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application identity.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "ypdubai";
    const PROJECT_ID: &'static str = "better_replays";
    /// Settings file below the project's config directory, without extension.
    const CONFIG_NAME: &'static str;
    /// Environment variable that overrides the default log filter.
    const LOG_ENV: &'static str = "BETTER_REPLAYS_LOG";
}

/// Files an application reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config: PathBuf,
    pub log: PathBuf,
}

impl AppPaths {
    pub fn resolve<A: Application>(path_context: &PathContext) -> Self {
        Self {
            config: path_context.config_file(Some(A::CONFIG_NAME)),
            log: path_context.log_file_now(),
        }
    }
}

/// Everything the bootstrap produced. Dropping it flushes and closes the
/// log file.
pub struct AppContext {
    path_context: PathContext,
    paths: AppPaths,
    version: &'static str,
    _log_guard: WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }

    pub fn config_path(&self) -> &Path {
        &self.paths.config
    }

    pub fn log_path(&self) -> &Path {
        &self.paths.log
    }
}

#[cfg(debug_assertions)]
fn path_context<A: Application>() -> PathContext {
    // Development builds keep their data next to the workspace.
    PathContext::with_base_path(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".out"),
        A::STUDIO,
        A::PROJECT_ID,
        A::APP_ID,
    )
}

#[cfg(not(debug_assertions))]
fn path_context<A: Application>() -> PathContext {
    PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID)
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Log filter from `env_var`, falling back to the build's default level.
pub fn log_filter(env_var: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level().into())
        .with_env_var(env_var)
        .from_env_lossy()
}

/// Installs the global subscriber: a non-blocking file layer plus the
/// console.
fn init_logging(log_path: &Path, filter: EnvFilter) -> Result<WorkerGuard, BoxError> {
    let log_dir = log_path
        .parent()
        .ok_or("log file path has no parent directory")?;
    let log_filename = log_path
        .file_name()
        .ok_or("log file path has no file name")?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_filename));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(guard)
}

pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Creates the project directories and starts logging.
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        let path_context = path_context::<A>();
        path_context.ensure_directories()?;

        let paths = AppPaths::resolve::<A>(&path_context);
        let guard = init_logging(&paths.log, log_filter(A::LOG_ENV))?;
        tracing::info!(
            app = A::APP_ID,
            version,
            config = %paths.config.display(),
            log = %paths.log.display(),
            "application initialized"
        );

        Ok(Self {
            context: AppContext {
                path_context,
                paths,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Hands a fresh Bevy `App` and the context to `configure`.
    ///
    /// ```ignore
    /// let mut app = AppBuilder::<ReplayViewer>::new("1.0.0")?
    ///     .build_with_bevy(|mut app, ctx| {
    ///         app.add_plugins(MinimalPlugins)
    ///             .add_plugins(ReplayCameraPlugin::new(ctx.config_path()));
    ///         app
    ///     });
    /// ```
    #[cfg(feature = "bevy")]
    pub fn build_with_bevy(
        self,
        configure: impl FnOnce(bevy::prelude::App, &AppContext) -> bevy::prelude::App,
    ) -> BevyApp<A> {
        let app = configure(bevy::prelude::App::new(), &self.context);
        BevyApp {
            context: self.context,
            app,
            _marker: PhantomData,
        }
    }
}

/// A configured Bevy app. Holds the context so logging outlives the run.
#[cfg(feature = "bevy")]
pub struct BevyApp<A: Application> {
    context: AppContext,
    app: bevy::prelude::App,
    _marker: PhantomData<A>,
}

#[cfg(feature = "bevy")]
impl<A: Application> BevyApp<A> {
    pub fn run(&mut self) -> bevy::app::AppExit {
        tracing::debug!(app = self.context.app_id(), "running");
        let exit = self.app.run();
        tracing::info!(app = self.context.app_id(), ?exit, "application exited");
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Viewer;

    impl Application for Viewer {
        const APP_ID: &'static str = "viewer";
        const CONFIG_NAME: &'static str = "better_replays";
        const LOG_ENV: &'static str = "APP_TEST_UNSET_LOG_FILTER";
    }

    #[test]
    fn test_paths_resolve_into_project_dirs() {
        let ctx = PathContext::with_base_path(
            PathBuf::from("/base"),
            Viewer::STUDIO,
            Viewer::PROJECT_ID,
            Viewer::APP_ID,
        );
        let paths = AppPaths::resolve::<Viewer>(&ctx);

        assert_eq!(
            paths.config,
            PathBuf::from("/base/ypdubai/better_replays/config/better_replays.toml")
        );
        assert!(paths.log.starts_with("/base/ypdubai/better_replays/logs"));
        let name = paths.log.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("viewer.") && name.ends_with(".log"));
    }

    #[test]
    fn test_log_filter_defaults_to_build_level() {
        let filter = log_filter(Viewer::LOG_ENV);
        assert_eq!(filter.max_level_hint(), Some(default_level()));
    }
}
