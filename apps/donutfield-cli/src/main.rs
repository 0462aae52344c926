use anyhow::Context;
use clap::{Parser, Subcommand};
use donutfield_assets::{AssetPaths, FontFile, FontSource, MatcapLibrary};
use donutfield_author::{TextParams, create_shape_cloud, create_text_mesh};
use donutfield_common::{MatcapPreset, ViewportSize};
use donutfield_render::{DebugTextRenderer, FixedFrames, Viewport};
use donutfield_scene::{Material, SharedMaterial};
use donutfield_tools::{PanelState, SceneInspector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "donutfield-cli", about = "Headless tools for the donut field")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info {
        /// Directory holding fonts/ and textures/
        #[arg(long, default_value = "./static")]
        assets_dir: PathBuf,
    },
    /// Build the scene and render it with the text renderer
    Render {
        /// Number of frames to run
        #[arg(long, default_value = "3")]
        frames: u64,
        /// Number of donuts
        #[arg(long, default_value = "50")]
        count: u32,
        /// Half-extent of the cube the donuts spawn in
        #[arg(long, default_value = "10")]
        radius: f32,
        /// Seed for donut placement
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Text to extrude
        #[arg(long, default_value = "Hello World!")]
        text: String,
        /// Typeface JSON font (defaults to the one under ./static)
        #[arg(long)]
        font: Option<PathBuf>,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
    },
    /// Inspect a typeface JSON font
    Font {
        path: PathBuf,
    },
}

struct RenderArgs {
    frames: u64,
    count: u32,
    radius: f32,
    seed: u64,
    text: String,
    size: ViewportSize,
}

/// Build the scene the desktop app shows and run it for `args.frames`
/// frames at 60 fps. Returns the last frame's text and the scene summary.
fn render_headless<F: FontSource>(args: &RenderArgs, font: &F) -> (String, String) {
    let mut panel = PanelState {
        text: args.text.clone(),
        count: args.count,
        radius: args.radius,
        ..PanelState::default()
    };
    panel.clamp();

    let mut viewport = Viewport::new(DebugTextRenderer::new(), args.size, 1.0);
    let text_material = SharedMaterial::new(Material::matcap(MatcapPreset::Clay).transparent());
    let donut_material = SharedMaterial::new(Material::matcap(MatcapPreset::Slime).transparent());

    match pollster::block_on(create_text_mesh(
        &panel.text,
        font,
        text_material,
        TextParams::default(),
    )) {
        Ok(mesh) => {
            viewport.add(mesh);
        }
        Err(e) => tracing::error!("text mesh unavailable, rendering donuts only: {e}"),
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let donuts = viewport.add(create_shape_cloud(
        panel.count as usize,
        panel.radius,
        &donut_material,
        &mut rng,
    ));

    let mut frames = FixedFrames::with_step(args.frames, 1.0 / 60.0);
    let rendered = viewport.run(&mut frames, |scene, clock| {
        if let Some(node) = scene.get_mut(donuts) {
            panel.apply_spin(node.transform_mut(), clock.elapsed());
        }
    });
    tracing::debug!(rendered, "headless run complete");

    let summary = SceneInspector::summary(viewport.scene()).to_string();
    (viewport.renderer().last().to_owned(), summary)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { assets_dir } => {
            println!("donutfield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", donutfield_scene::crate_info());
            println!("assets: {}", donutfield_assets::crate_info());
            println!("author: {}", donutfield_author::crate_info());
            println!("render: {}", donutfield_render::crate_info());
            println!("input: {}", donutfield_input::crate_info());
            println!("tools: {}", donutfield_tools::crate_info());

            let paths = AssetPaths::new(assets_dir);
            let matcaps = MatcapLibrary::load(&paths);
            println!(
                "matcaps: {}/{} loaded from {}",
                matcaps.loaded_count(),
                MatcapPreset::ALL.len(),
                paths.root().display()
            );
            for (preset, image) in matcaps.iter() {
                let origin = if image.fallback { "generated" } else { "file" };
                println!(
                    "  {:>2} {:<13} {}x{} {} id={}",
                    preset.file_number(),
                    preset.name(),
                    image.width,
                    image.height,
                    origin,
                    image.id
                );
            }
        }
        Commands::Render {
            frames,
            count,
            radius,
            seed,
            text,
            font,
            width,
            height,
        } => {
            let font = FontFile::new(font.unwrap_or_else(|| AssetPaths::new("./static").font()));
            let args = RenderArgs {
                frames,
                count,
                radius,
                seed,
                text,
                size: ViewportSize::new(width, height),
            };
            let (frame, summary) = render_headless(&args, &font);
            print!("{frame}");
            println!("{summary}");
        }
        Commands::Font { path } => {
            let font = pollster::block_on(FontFile::new(&path).load())
                .with_context(|| format!("loading {}", path.display()))?;
            let bounds = font.bounds();
            println!("Font: {}", path.display());
            println!("Family: {}", font.family_name());
            println!("Glyphs: {}", font.glyph_count());
            println!("Resolution: {}", font.resolution());
            println!("Bounds: yMin={} yMax={}", bounds.y_min, bounds.y_max);
            let size = TextParams::default().size;
            println!("Line height at size {size}: {:.4}", font.line_height(size));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutfield_assets::FontData;

    const FONT: &str = r#"{
        "resolution": 1000,
        "boundingBox": { "yMin": -200, "yMax": 800 },
        "glyphs": {
            "?": { "ha": 500, "o": "m 0 0 l 100 0 l 100 100 l 0 100" },
            " ": { "ha": 250 }
        }
    }"#;

    fn args() -> RenderArgs {
        RenderArgs {
            frames: 3,
            count: 20,
            radius: 5.0,
            seed: 1,
            text: "Hi".into(),
            size: ViewportSize::new(800, 600),
        }
    }

    #[test]
    fn renders_text_and_donuts() {
        let (frame, summary) = render_headless(&args(), &FontData::new(FONT));
        assert!(frame.contains("Frame 3"));
        assert!(summary.contains("nodes=2"));
        assert!(summary.contains("instances=21"));
    }

    #[test]
    fn missing_font_renders_donuts_only() {
        let font = FontFile::new("/no/such/font.typeface.json");
        let (_, summary) = render_headless(&args(), &font);
        assert!(summary.contains("nodes=1"));
        assert!(summary.contains("instances=20"));
    }

    #[test]
    fn same_seed_same_output() {
        let font = FontData::new(FONT);
        assert_eq!(render_headless(&args(), &font), render_headless(&args(), &font));
    }
}
