use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use poke_classify::common::{InferenceDevice, ModelConfig, PokeImage};
use poke_classify::data::FsAccess;
use poke_classify::service::ClassifyService;

const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Classify image files with a bundled ONNX model, one file per frame.
#[derive(Parser, Debug)]
#[command(name = "poke_classify", version)]
struct Args {
    /// JSON model config. Defaults to ./poke/config.json or <config dir>/poke/config.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ONNX model file
    #[arg(long)]
    model: Option<PathBuf>,

    /// Label file, one class name per line
    #[arg(long)]
    labels: Option<PathBuf>,

    /// ONNX Runtime shared library
    #[arg(long)]
    ort_lib: Option<PathBuf>,

    /// cpu, cuda, tensorrt or coreml
    #[arg(long)]
    device: Option<String>,

    /// GPU ordinal; applies to the configured device when --device is not given
    #[arg(long)]
    device_id: Option<usize>,

    #[arg(long)]
    input_size: Option<u32>,

    /// Log per-stage timings
    #[arg(long)]
    profile: bool,

    /// Seconds to wait for each result
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[arg(required = true)]
    images: Vec<PathBuf>,
}

/// `--config` wins over a discovered config file, which wins over the defaults.
fn base_config(explicit: Option<&Path>, discovered: Option<PathBuf>) -> anyhow::Result<ModelConfig> {
    if let Some(path) = explicit {
        return ModelConfig::from_json_file(path);
    }
    match discovered {
        Some(path) => {
            log::info!("Using config {}", path.display());
            ModelConfig::from_json_file(path)
        }
        None => Ok(ModelConfig::default()),
    }
}

/// `./poke/config.json`, then `<config dir>/poke/config.json`.
fn discover_config() -> Option<PathBuf> {
    [FsAccess::Current, FsAccess::Config]
        .iter()
        .find_map(|dir| dir.existing_file(DEFAULT_CONFIG_FILE))
}

fn apply_overrides(mut config: ModelConfig, args: &Args) -> anyhow::Result<ModelConfig> {
    if let Some(model) = &args.model {
        config.weights_path = model.clone();
    }
    if let Some(labels) = &args.labels {
        config.labels_path = labels.clone();
    }
    if let Some(ort_lib) = &args.ort_lib {
        config.ort_lib_path = ort_lib.clone();
    }
    match (&args.device, args.device_id) {
        (Some(device), device_id) => {
            let device_id = device_id.unwrap_or(config.inference_device.device_id());
            let device = InferenceDevice::from_name(device, device_id).with_context(|| {
                format!(
                    "Unknown device '{}', expected one of: {}",
                    device,
                    InferenceDevice::all_inference_devices().join(", ")
                )
            })?;
            config.set_device_type(device);
        }
        (None, Some(device_id)) => {
            if config.inference_device == InferenceDevice::CPU {
                log::warn!("--device-id {device_id} has no effect on the CPU device");
            }
            let device = config.inference_device.with_device_id(device_id);
            config.set_device_type(device);
        }
        (None, None) => {}
    }
    if let Some(size) = args.input_size {
        config.input_size = size;
    }
    config.profile |= args.profile;

    Ok(config)
}

fn load_config(args: &Args) -> anyhow::Result<ModelConfig> {
    let discovered = match args.config {
        Some(_) => None,
        None => discover_config(),
    };
    let config = base_config(args.config.as_deref(), discovered)?;
    apply_overrides(config, args)
}

fn run(args: Args) -> anyhow::Result<usize> {
    let config = load_config(&args)?;
    let classifier = poke_classify::init_classifier(&config).context("Failed to build classifier")?;
    let service = ClassifyService::spawn(classifier)?;
    let timeout = Duration::from_secs(args.timeout);

    let mut failures = 0;
    for path in &args.images {
        let frame = match PokeImage::open(path) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Skipping {}: {}", path.display(), err);
                failures += 1;
                continue;
            }
        };

        service.submit(frame)?;
        match service.wait_latest(timeout)? {
            Some(response) => match response.result {
                Ok(classification) => println!("{}\n{}\n", path.display(), classification.message()),
                Err(err) => {
                    log::error!("{}: {}", path.display(), err);
                    failures += 1;
                }
            },
            None => {
                log::error!("{}: no result after {:?}", path.display(), timeout);
                service.cancel_pending();
                failures += 1;
            }
        }
    }

    Ok(failures)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            log::warn!("{failures} image(s) could not be classified");
            ExitCode::from(2)
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("poke_classify").chain(argv.iter().copied())).unwrap()
    }

    fn config_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn defaults_without_any_config() {
        let config = apply_overrides(base_config(None, None).unwrap(), &args(&["a.jpg"])).unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn explicit_config_beats_discovered_one() {
        let explicit = config_file(r#"{ "input_size": 160 }"#);
        let discovered = config_file(r#"{ "input_size": 96, "num_classes": 3 }"#);

        let config = base_config(Some(explicit.path()), Some(discovered.path().to_path_buf())).unwrap();
        assert_eq!(config.input_size, 160);
        assert_eq!(config.num_classes, 150);

        let config = base_config(None, Some(discovered.path().to_path_buf())).unwrap();
        assert_eq!(config.input_size, 96);
        assert_eq!(config.num_classes, 3);
    }

    #[test]
    fn flags_beat_the_config_file() {
        let file = config_file(
            r#"{ "weights_path": "file.onnx", "labels_path": "file.txt", "input_size": 160,
                 "inference_device": { "type": "cuda", "id": 1 } }"#,
        );
        let path = file.path().to_str().unwrap();
        let argv = args(&["--config", path, "--model", "flag.onnx", "--input-size", "128", "a.jpg"]);

        let config = load_config(&argv).unwrap();
        assert_eq!(config.weights_path, PathBuf::from("flag.onnx"));
        assert_eq!(config.labels_path, PathBuf::from("file.txt"));
        assert_eq!(config.input_size, 128);
        assert_eq!(config.inference_device, InferenceDevice::CUDA(1));
    }

    #[test]
    fn bad_config_file_is_an_error() {
        let file = config_file("{ not json");
        assert!(base_config(Some(file.path()), None).is_err());
        assert!(base_config(Some(Path::new("/nonexistent/config.json")), None).is_err());
    }

    #[test]
    fn device_id_applies_to_the_configured_device() {
        let cuda = ModelConfig { inference_device: InferenceDevice::CUDA(0), ..Default::default() };

        let config = apply_overrides(cuda.clone(), &args(&["--device-id", "2", "a.jpg"])).unwrap();
        assert_eq!(config.inference_device, InferenceDevice::CUDA(2));

        let config = apply_overrides(cuda.clone(), &args(&["--device", "tensorrt", "a.jpg"])).unwrap();
        assert_eq!(config.inference_device, InferenceDevice::TensorRT(0));

        let config = apply_overrides(cuda, &args(&["--device", "coreml", "--device-id", "1", "a.jpg"])).unwrap();
        assert_eq!(config.inference_device, InferenceDevice::CoreML(1));

        let config = apply_overrides(ModelConfig::default(), &args(&["--device-id", "3", "a.jpg"])).unwrap();
        assert_eq!(config.inference_device, InferenceDevice::CPU);
    }

    #[test]
    fn unknown_device_is_rejected() {
        let err = apply_overrides(ModelConfig::default(), &args(&["--device", "rocm", "a.jpg"])).unwrap_err();
        assert!(err.to_string().contains("rocm"));
    }
}
