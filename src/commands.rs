use crate::cli::{PipelineArgs, ScheduleArgs};
use std::process::ExitCode;
use tracing::info;
use vigocam::config::Config;
use vigocam::pipeline::{Pipeline, PipelineError};
use vigocam::scheduler::{Schedule, run_scheduled};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exit code when the camera list could not be obtained
const EXIT_NO_METADATA: u8 = 2;

fn load_config(args: &PipelineArgs) -> Result<Config, AnyError> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };

    if let Some(dir) = &args.output_dir {
        config.download.output_dir = dir.clone();
    }

    Ok(config)
}

pub async fn fetch(args: PipelineArgs) -> Result<ExitCode, AnyError> {
    let config = load_config(&args)?;
    let pipeline = Pipeline::from_config(config)?;

    match pipeline.run_once(&args.run_options()).await {
        Ok(_) => {
            info!("Process completed");
            Ok(ExitCode::SUCCESS)
        }
        Err(PipelineError::NoMetadata) => Ok(ExitCode::from(EXIT_NO_METADATA)),
        Err(PipelineError::CameraNotFound(_)) => Ok(ExitCode::SUCCESS),
        Err(e) => Err(e.into()),
    }
}

pub async fn schedule(args: ScheduleArgs) -> Result<ExitCode, AnyError> {
    let mut config = load_config(&args.pipeline)?;
    if let Some(secs) = args.interval_secs {
        config.schedule.interval_secs = secs;
    }
    if let Some(secs) = args.duration_secs {
        config.schedule.duration_secs = secs;
    }
    if args.max_iterations.is_some() {
        config.schedule.max_iterations = args.max_iterations;
    }
    config.validate()?;

    let schedule = Schedule::from_config(&config.schedule);
    let pipeline = Pipeline::from_config(config)?;
    let options = args.pipeline.run_options();

    info!(
        interval_secs = schedule.interval.as_secs(),
        duration_secs = schedule.duration.as_secs(),
        "Starting schedule"
    );

    let (pipeline_ref, options_ref) = (&pipeline, &options);
    run_scheduled(&schedule, move |_| async move {
        pipeline_ref.run_once(options_ref).await.map(|_| ())
    })
    .await;

    let snapshot = pipeline.metrics().snapshot();
    info!(
        runs = snapshot.runs,
        runs_without_metadata = snapshot.runs_without_metadata,
        images_saved = snapshot.images_saved,
        images_failed = snapshot.images_failed,
        "Finished"
    );

    Ok(ExitCode::SUCCESS)
}
