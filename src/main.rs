//! ras-predict entrypoint: reads the RAS log once, then runs every configured
//! experiment (partition, extract, train or load model, score, evaluate) and
//! writes one report per experiment.

use ras_predict::{
    classifier::{Classifier, Model},
    config::{PredictorConfig, StrategyConfig},
    evaluation::evaluate,
    filter::RedundancyFilter,
    logging::{ExperimentReport, StructuredLogger},
    records::{self, LogRecord, RecordSource},
    strategy::Strategy,
};
use rand::Rng;
use tracing::{error, info};

fn run_experiment<R: Rng>(
    config: &PredictorConfig,
    experiment: &StrategyConfig,
    records: &[LogRecord],
    rng: &mut R,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let strategy = Strategy::new(experiment.clone())?;
    let dataset = experiment.dataset_name.as_str();
    info!(dataset, strategy = strategy.name(), "experiment starting");

    let examples = strategy.parse_data(records)?;
    let training = strategy.training_set(examples.clone(), rng)?;
    let svm = strategy.svm_light(&config.classifier);

    let model_path = strategy.model_path(&config.model_dir);
    let cached_model = model_path.exists();
    let model = if cached_model {
        info!(path = %model_path.display(), "using cached model");
        Model::load(&model_path)?
    } else {
        let model = svm.train(&training)?;
        model.save(&model_path)?;
        model
    };

    let predictions = svm.predict(&model, &examples)?;
    let correct: Vec<bool> = examples.iter().map(|e| e.failure).collect();
    let evaluation = evaluate(&correct, &predictions)?;

    std::fs::create_dir_all(&config.results_dir)?;
    let results_path = config.results_dir.join(format!("{}Results", dataset));
    std::fs::write(&results_path, evaluation.to_string())?;
    info!(
        path = %results_path.display(),
        total_accuracy = evaluation.percentages.total_accuracy,
        failure_accuracy = evaluation.percentages.failure_accuracy,
        "experiment complete"
    );

    let report = ExperimentReport {
        ts: chrono::Utc::now().to_rfc3339(),
        dataset,
        strategy: strategy.name(),
        examples: examples.len(),
        training_examples: training.len(),
        cached_model,
        evaluation: &evaluation,
    };
    StructuredLogger::emit_json(&report, &mut std::io::stdout().lock())?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("RAS_PREDICT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = PredictorConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(log_path = ?config.input.log_path, experiments = config.experiments.len(), "ras-predict starting");

    let mut records = records::open(&config.input)?.read_records()?;
    info!(count = records.len(), "read records");
    if config.input.filter_redundant {
        records = RedundancyFilter::new().filter(records)?;
    }

    let mut rng = rand::thread_rng();
    let mut failed = 0;
    for experiment in &config.experiments {
        if let Err(e) = run_experiment(&config, experiment, &records, &mut rng) {
            error!(dataset = %experiment.dataset_name, error = %e, "experiment failed");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} experiments failed", failed, config.experiments.len()).into());
    }
    info!("ras-predict done");
    Ok(())
}
