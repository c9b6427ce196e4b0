use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use retina::{BuiltinModel, Classifier, ModelManager};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Alexnet,
    Resnet,
}

impl From<ModelArg> for BuiltinModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Alexnet => BuiltinModel::AlexNet,
            ModelArg::Resnet => BuiltinModel::ResNet,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image paths relative to the images directory, joined with `@`
    /// (e.g. `cat.jpg@dog.jpg`)
    paths: String,

    /// The built-in model to classify with
    #[arg(short, long, value_enum, default_value_t = ModelArg::Alexnet)]
    model: ModelArg,

    /// Directory the image paths are resolved against
    #[arg(long, default_value = "./LocalDir")]
    images_dir: PathBuf,

    /// Force a fresh download of the model files
    #[arg(short, long)]
    fresh: bool,
}

/// Splits the `@`-joined positional argument into ordered path segments.
fn split_paths(arg: &str) -> Vec<String> {
    arg.split('@').map(str::to_string).collect()
}

async fn ensure_model_downloaded(model: BuiltinModel, fresh: bool) -> Result<()> {
    let manager = ModelManager::new_default().context("Failed to create model manager")?;

    if fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(model)?;
    }

    if !manager.is_model_downloaded(model) {
        info!("Downloading model...");
        manager
            .download_model(model)
            .await
            .context("Failed to download model files")?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let model: BuiltinModel = args.model.into();

    // Ensure model is downloaded before proceeding
    ensure_model_downloaded(model, args.fresh).await?;

    let start_time = Instant::now();
    info!("Building classifier...");

    let classifier = Classifier::builder().with_model(model)?.build()?;

    let build_time = start_time.elapsed();
    info!("Classifier built in {:.2?}", build_time);

    let paths = split_paths(&args.paths);
    info!("Classifying {} image(s)...", paths.len());

    // Each result line is printed as soon as it is produced, so a failure
    // partway through still leaves the lines for the preceding images.
    classifier
        .run(&paths, &args.images_dir, |line| println!("{}", line))
        .context("Classification aborted")?;

    info!(
        "Classified {} image(s) in {:.2?}",
        paths.len(),
        start_time.elapsed() - build_time
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paths_preserves_order() {
        assert_eq!(split_paths("cat.jpg@dog.jpg"), vec!["cat.jpg", "dog.jpg"]);
    }

    #[test]
    fn test_split_paths_single_entry() {
        assert_eq!(split_paths("cat.jpg"), vec!["cat.jpg"]);
    }
}
