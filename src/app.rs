use std::sync::Arc;

use log::info;
use rangeraptor_core::prelude::{
    ConcurrentCompositeRaptorRouter, DefaultRaptorRouter, RaptorConfig, RaptorRequest,
    RaptorResponse, RaptorService, TransitDataProvider,
};

use crate::cli::{Args, OutputFormat};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::logging;
use crate::output::{Report, summary};
use crate::request::RequestFile;
use crate::timetable::TimetableFile;

/// Builds the transit data and runs the request, next to the configured
/// alternative profile when there is one
pub fn execute(
    config: &AppConfig,
    timetable: &TimetableFile,
    request: &RequestFile,
) -> Result<RaptorResponse, CliError> {
    let data = Arc::new(timetable.build());
    let timeout = config.routing.timeout();
    let request = request.to_request(&data, timeout)?;
    let service = RaptorService::new(config.raptor.clone());

    let Some(alternative) = config.routing.alternative_profile else {
        return Ok(service.route(data.as_ref(), &request)?);
    };

    info!(
        "Running {:?} search with {:?} alternative",
        request.profile, alternative
    );
    let alternative_request = RaptorRequest {
        profile: alternative,
        ..request.clone()
    };
    let provider: Arc<dyn TransitDataProvider> = data;
    let main = DefaultRaptorRouter::new(Arc::clone(&provider), request, service.clone());
    let alternative = DefaultRaptorRouter::new(provider, alternative_request, service);
    let mut router = ConcurrentCompositeRaptorRouter::new(Arc::new(main), Arc::new(alternative));
    if let Some(timeout) = timeout {
        router = router.with_timeout(timeout);
    }

    let mut raptor_config = RaptorConfig::new(config.raptor.clone())?;
    let response = router.route(&raptor_config);
    raptor_config.shutdown();
    Ok(response?)
}

pub fn run(args: &Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    logging::init(args.log_level.as_deref().unwrap_or(&config.logging.level))?;

    let timetable = TimetableFile::from_file(&args.timetable)?;
    let request = RequestFile::from_file(&args.request)?;
    let response = execute(&config, &timetable, &request)?;

    let report = Report {
        service_date: request.service_date,
        response: &response,
    };
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => println!("{}", summary(&response, request.service_date)),
        OutputFormat::Both => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            eprintln!("{}", summary(&response, request.service_date));
        }
    }
    Ok(())
}
