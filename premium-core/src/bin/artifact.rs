//! premium-artifact - offline tooling for model artifacts
//!
//! inspect / verify an artifact, fit a linear artifact from the insurance
//! CSV, or price a single profile from the command line.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use premium_core::logic::model::{fit_linear_artifact, TrainingSample};
use premium_core::{ModelArtifact, PremiumEngine, RawInput, Region, Sex};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print artifact metadata and layout
    Inspect {
        path: PathBuf,
    },
    /// Load the artifact, build its regressor and run the startup probe
    Verify {
        path: PathBuf,
    },
    /// Fit scaler + OLS on a CSV with age,sex,bmi,children,smoker,region,charges
    Fit {
        #[clap(short, long)]
        data: PathBuf,

        #[clap(short, long)]
        out: PathBuf,

        #[clap(long, default_value = "insureai-linear")]
        name: String,
    },
    /// Estimate one profile
    Predict {
        /// Artifact to use; bundled reference model when omitted
        artifact: Option<PathBuf>,

        #[clap(long)]
        age: u32,

        #[clap(long)]
        sex: Sex,

        #[clap(long)]
        bmi: f64,

        #[clap(long, default_value_t = 0)]
        children: u32,

        #[clap(long)]
        smoker: bool,

        #[clap(long)]
        region: Region,
    },
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    age: u32,
    sex: String,
    bmi: f64,
    children: u32,
    smoker: String,
    region: String,
    charges: f64,
}

impl CsvRecord {
    fn into_sample(self) -> Result<TrainingSample> {
        let smoker = match self.smoker.trim().to_ascii_lowercase().as_str() {
            "yes" => true,
            "no" => false,
            other => bail!("smoker must be yes/no, got '{}'", other),
        };
        Ok(TrainingSample {
            input: RawInput {
                age: self.age,
                sex: self.sex.parse()?,
                bmi: self.bmi,
                children: self.children,
                smoker,
                region: self.region.parse()?,
            },
            charges: self.charges,
        })
    }
}

fn load_csv(path: &Path) -> Result<Vec<TrainingSample>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let mut samples = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: CsvRecord = result.with_context(|| format!("row {}", line + 2))?;
        samples.push(record.into_sample().with_context(|| format!("row {}", line + 2))?);
    }
    Ok(samples)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Inspect { path } => {
            let (artifact, sum) = ModelArtifact::load(&path)?;
            println!("name:       {}", artifact.name);
            println!("algorithm:  {}", artifact.algorithm);
            println!("kind:       {}", artifact.model.kind());
            println!("layout:     v{} {}", artifact.layout.version, artifact.layout.features.join(","));
            if let Some(trained_at) = artifact.trained_at {
                println!("trained at: {}", trained_at.to_rfc3339());
            }
            if let Some(m) = &artifact.metrics {
                println!("metrics:    R²={:.4} RMSE={:.2} MAE={:.2}", m.r2, m.rmse, m.mae);
            }
            println!("sha256:     {}", sum);
        }
        Command::Verify { path } => {
            let engine = PremiumEngine::load(&path)?;
            let probe = engine.verify()?;
            println!(
                "OK {} ({}) probe estimate {:.2}",
                engine.model_info().name,
                engine.model_info().kind,
                probe.cost()
            );
        }
        Command::Fit { data, out, name } => {
            let samples = load_csv(&data)?;
            log::info!("Read {} samples from {}", samples.len(), data.display());
            let artifact = fit_linear_artifact(&name, &samples)?;
            artifact.save(&out)?;
            // Round-trip through the loader so a written artifact is always usable
            PremiumEngine::load(&out)?;
            println!("Wrote {}", out.display());
        }
        Command::Predict { artifact, age, sex, bmi, children, smoker, region } => {
            let engine = match artifact {
                Some(path) => PremiumEngine::load(path)?,
                None => PremiumEngine::reference()?,
            };
            let input = RawInput { age, sex, bmi, children, smoker, region };
            let estimate = engine.estimate(&input)?;
            println!("annual:  {:.2}", estimate.cost());
            println!("monthly: {:.2}", estimate.monthly());
            println!("weekly:  {:.2}", estimate.weekly());
            for driver in engine.cost_drivers(&input)? {
                println!("  {:<8} {}", driver.factor, driver.assessment);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_record_parses_notebook_row() {
        let record = CsvRecord {
            age: 19,
            sex: "female".to_string(),
            bmi: 27.9,
            children: 0,
            smoker: "yes".to_string(),
            region: "southwest".to_string(),
            charges: 16884.924,
        };
        let sample = record.into_sample().unwrap();
        assert!(sample.input.smoker);
        assert_eq!(sample.input.region, Region::Southwest);
    }

    #[test]
    fn test_csv_record_rejects_bad_smoker() {
        let record = CsvRecord {
            age: 19,
            sex: "female".to_string(),
            bmi: 27.9,
            children: 0,
            smoker: "maybe".to_string(),
            region: "southwest".to_string(),
            charges: 1.0,
        };
        assert!(record.into_sample().is_err());
    }
}
