//! Entry point for objview.
//! Usage: objview [--flags] <model.obj>

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use asset::{NormalPolicy, NormalizeConfig, obj::load_mesh_from_path};
use corelib::{AnchorMode, ViewerConfig};
use platform::ViewerOptions;

const USAGE: &str = "usage: objview [--size=WxH] [--width=N] [--height=N] \
[--gpu-backend=auto|vulkan|dx12|metal|gl] [--scale-margin=F] [--normals=smooth|flat] \
[--anchor=chained|fixed] [--sensitivity=F] [--radius=F] <model.obj>";

fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn parse_num<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    val.parse::<T>()
        .with_context(|| format!("Invalid value '{val}' for --{flag}"))
}

#[derive(Debug)]
struct Args {
    obj_path: PathBuf,
    backends: wgpu::Backends,
    viewer: ViewerConfig,
    normalize: NormalizeConfig,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut obj_path: Option<PathBuf> = None;
    let mut backends = wgpu::Backends::all(); // default = auto
    let mut viewer = ViewerConfig::default();
    let mut normalize = NormalizeConfig::default();

    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = parse_backend(val);
        } else if let Some(v) = arg.strip_prefix("--size=") {
            let (sw, sh) = v
                .split_once('x')
                .or_else(|| v.split_once('X'))
                .with_context(|| format!("Expected --size=WxH, got '{v}'"))?;
            viewer.width = parse_num("size", sw)?;
            viewer.height = parse_num("size", sh)?;
        } else if let Some(v) = arg.strip_prefix("--width=") {
            viewer.width = parse_num("width", v)?;
        } else if let Some(v) = arg.strip_prefix("--height=") {
            viewer.height = parse_num("height", v)?;
        } else if let Some(v) = arg.strip_prefix("--scale-margin=") {
            normalize.scale_margin = parse_num("scale-margin", v)?;
        } else if let Some(v) = arg.strip_prefix("--normals=") {
            normalize.normal_policy = match v.to_ascii_lowercase().as_str() {
                "smooth" => NormalPolicy::Smooth,
                "flat" => NormalPolicy::Flat,
                other => bail!("Unknown normal policy '{other}' (expected smooth|flat)"),
            };
        } else if let Some(v) = arg.strip_prefix("--anchor=") {
            viewer.arcball.anchor = match v.to_ascii_lowercase().as_str() {
                "chained" | "chain" => AnchorMode::Chained,
                "fixed" => AnchorMode::Fixed,
                other => bail!("Unknown anchor mode '{other}' (expected chained|fixed)"),
            };
        } else if let Some(v) = arg.strip_prefix("--sensitivity=") {
            viewer.arcball.sensitivity = parse_num("sensitivity", v)?;
        } else if let Some(v) = arg.strip_prefix("--radius=") {
            viewer.arcball.radius = parse_num("radius", v)?;
        } else if arg.starts_with("--") {
            bail!("Unknown flag '{arg}'\n{USAGE}");
        } else if obj_path.replace(PathBuf::from(&arg)).is_some() {
            bail!("Only one .obj path may be given\n{USAGE}");
        }
    }

    let obj_path = obj_path.with_context(|| format!(".obj path not given\n{USAGE}"))?;
    viewer.validate()?;

    Ok(Args {
        obj_path,
        backends,
        viewer,
        normalize,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    log::info!(
        "Starting objview. Backend: {:?}, window_size={}x{}, anchor={:?}",
        args.backends,
        args.viewer.width,
        args.viewer.height,
        args.viewer.arcball.anchor
    );
    log::info!("Keys: A animate, P projection, X/Y/Z rotate (shift reverses), 1/2 zoom, R reset, Esc quit");

    let mesh = load_mesh_from_path(&args.obj_path, &args.normalize)?;
    let title = format!("objview - {}", args.obj_path.display());

    platform::run_viewer(ViewerOptions {
        title,
        config: args.viewer,
        mesh,
        backends: args.backends,
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_with_only_a_path() {
        let parsed = args(&["cow.obj"]).expect("parse");
        assert_eq!(parsed.obj_path, PathBuf::from("cow.obj"));
        assert_eq!(parsed.viewer, ViewerConfig::default());
        assert_eq!(parsed.normalize, NormalizeConfig::default());
        assert_eq!(parsed.backends, wgpu::Backends::all());
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = args(&[
            "--size=800x600",
            "--scale-margin=1.3",
            "--normals=flat",
            "--anchor=fixed",
            "--sensitivity=2.5",
            "--gpu-backend=vulkan",
            "bunny.obj",
        ])
        .expect("parse");
        assert_eq!((parsed.viewer.width, parsed.viewer.height), (800, 600));
        assert_eq!(parsed.normalize.scale_margin, 1.3);
        assert_eq!(parsed.normalize.normal_policy, NormalPolicy::Flat);
        assert_eq!(parsed.viewer.arcball.anchor, AnchorMode::Fixed);
        assert_eq!(parsed.viewer.arcball.sensitivity, 2.5);
        assert_eq!(parsed.backends, wgpu::Backends::VULKAN);
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(args(&[]).is_err());
        assert!(args(&["a.obj", "b.obj"]).is_err());
        assert!(args(&["--normals=phong", "a.obj"]).is_err());
        assert!(args(&["--width=abc", "a.obj"]).is_err());
        assert!(args(&["--width=0", "a.obj"]).is_err());
        assert!(args(&["--bogus", "a.obj"]).is_err());
    }
}
