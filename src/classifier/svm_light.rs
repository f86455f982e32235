//! SVM-light adapter: `svm_learn <training> <model>` and
//! `svm_classify <input> <model> <output>`, exchanging data through scratch files.
//! The tools are run to completion; there is no timeout.

use super::{Classifier, Model, ScratchFile, ScratchPaths};
use crate::config::ClassifierConfig;
use crate::dataset::{build_data_file_content, parse_scores, LabelPolarity};
use crate::error::{PredictError, Result};
use crate::features::TrainingExample;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

pub struct SvmLight {
    learn_program: String,
    classify_program: String,
    paths: ScratchPaths,
    polarity: LabelPolarity,
}

impl SvmLight {
    pub fn new(config: &ClassifierConfig, paths: ScratchPaths, polarity: LabelPolarity) -> Self {
        Self {
            learn_program: config.learn_program.clone(),
            classify_program: config.classify_program.clone(),
            paths,
            polarity,
        }
    }

    fn run(&self, program: &str, args: &[&Path]) -> Result<()> {
        info!(program, "running classifier");
        let output = Command::new(program).args(args).output()?;
        debug!(
            program,
            stdout = %String::from_utf8_lossy(&output.stdout),
            "classifier output"
        );
        if !output.status.success() {
            warn!(
                program,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "classifier failed"
            );
            return Err(PredictError::ClassifierFailed {
                program: program.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(())
    }

    /// A model file left behind by an earlier run is replaced rather than reported.
    fn clear_stale_model(&self) -> Result<()> {
        if self.paths.model.exists() {
            warn!(path = %self.paths.model.display(), "removing stale model file");
            std::fs::remove_file(&self.paths.model)?;
        }
        Ok(())
    }
}

impl Classifier for SvmLight {
    fn train(&self, examples: &[TrainingExample]) -> Result<Model> {
        let content = build_data_file_content(examples, self.polarity)?;
        let training = ScratchFile::create(self.paths.training.clone(), &content)?;
        self.clear_stale_model()?;
        let model_file = ScratchFile::reserve(self.paths.model.clone())?;

        self.run(&self.learn_program, &[training.path(), model_file.path()])?;
        let model = Model::new(model_file.read_to_string()?);
        info!(examples = examples.len(), "model trained");
        Ok(model)
    }

    fn score(&self, model: &Model, examples: &[TrainingExample]) -> Result<Vec<f64>> {
        let content = build_data_file_content(examples, self.polarity)?;
        let input = ScratchFile::create(self.paths.predictions_in.clone(), &content)?;
        let output = ScratchFile::reserve(self.paths.predictions_out.clone())?;
        self.clear_stale_model()?;
        let model_file = ScratchFile::create(self.paths.model.clone(), model.as_str())?;

        self.run(
            &self.classify_program,
            &[input.path(), model_file.path(), output.path()],
        )?;
        let scores = parse_scores(&output.read_to_string()?)?;
        debug!(scores = scores.len(), "read prediction scores");
        Ok(scores)
    }
}
