//! Entry point for Veles3D: CLI flags + logging, then hand off to platform.

use anyhow::{Context, Result};

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{other}', falling back to auto.");
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_model_arg() -> Option<String> {
    // --model=path/to/mesh.obj; absent means the built-in demo cube.
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--model=") {
            return Some(val.to_string());
        }
    }
    None
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let backends = parse_backend_arg();
    let (width, height) = parse_size_args();
    let model = parse_model_arg();

    let mesh = match &model {
        Some(path) => asset::load_obj_from_path(path)
            .with_context(|| format!("Failed to load model '{path}'"))?,
        None => asset::MeshData::demo_cube(),
    };
    log::info!(
        "Starting Veles3D. Backend: {:?}, window_size={}x{}, mesh: {} vertices / {} triangles",
        backends,
        width,
        height,
        mesh.vertices.len(),
        mesh.triangle_count()
    );

    platform::run(
        platform::AppConfig {
            backends,
            width,
            height,
        },
        mesh,
    )?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
