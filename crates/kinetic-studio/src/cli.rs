use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kinetic_demo::DemoConfig;
use kinetic_demo::state::{Operation, RendererKind};
use kinetic_demo::template::ShapeKind;

#[derive(Debug, Parser)]
#[command(name = "kinetic-studio", version, about = "Animated 2D shapes on three renderers")]
pub struct Cli {
    #[command(flatten)]
    pub demo: DemoArgs,

    /// Log filter, env_logger syntax (overrides RUST_LOG).
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the animation headless and write the final frame as SVG.
    Export {
        /// Output file.
        #[arg(long, short, alias = "export", value_name = "FILE")]
        out: PathBuf,

        /// Frames to simulate.
        #[arg(long, default_value_t = 120)]
        frames: u32,
    },
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// svg, canvas or webgl.
    #[arg(long, global = true)]
    pub renderer: Option<RendererKind>,

    /// Initial object count.
    #[arg(long, global = true)]
    pub count: Option<u32>,

    /// Comma list of shape kinds to spawn.
    #[arg(long, global = true, value_delimiter = ',')]
    pub shapes: Vec<ShapeKind>,

    /// Comma list of operations to enable.
    #[arg(long, global = true, value_delimiter = ',')]
    pub ops: Vec<Operation>,

    /// Canvas width in logical px.
    #[arg(long, global = true)]
    pub width: Option<f64>,

    /// Canvas height in logical px.
    #[arg(long, global = true)]
    pub height: Option<f64>,

    /// RNG seed for reproducible runs.
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

impl DemoArgs {
    /// Overlays the given flags on the default configuration.
    pub fn to_config(&self) -> DemoConfig {
        let mut cfg = DemoConfig::default();
        if let Some(r) = self.renderer {
            cfg.renderer = r;
        }
        if let Some(c) = self.count {
            cfg.count = c;
        }
        if !self.shapes.is_empty() {
            cfg.shapes = self.shapes.clone();
        }
        cfg.operations = self.ops.clone();
        if let Some(w) = self.width {
            cfg.width = w;
        }
        if let Some(h) = self.height {
            cfg.height = h;
        }
        cfg.seed = self.seed;
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_give_defaults() {
        let cli = Cli::try_parse_from(["kinetic-studio"]).unwrap();
        assert!(cli.command.is_none());
        let cfg = cli.demo.to_config();
        assert_eq!(cfg.renderer, RendererKind::Svg);
        assert_eq!(cfg.shapes, vec![ShapeKind::Triangle]);
        assert!(cfg.operations.is_empty());
        assert_eq!(cfg.count, 0);
    }

    #[test]
    fn window_flags_parse() {
        let cli = Cli::try_parse_from([
            "kinetic-studio",
            "--renderer",
            "webgl",
            "--count",
            "250",
            "--shapes",
            "star,circle",
            "--ops",
            "position,rotation",
            "--seed",
            "9",
        ])
        .unwrap();
        let cfg = cli.demo.to_config();
        assert_eq!(cfg.renderer, RendererKind::Webgl);
        assert_eq!(cfg.count, 250);
        assert_eq!(cfg.shapes, vec![ShapeKind::Star, ShapeKind::Circle]);
        assert_eq!(cfg.operations, vec![Operation::Position, Operation::Rotation]);
        assert_eq!(cfg.seed, Some(9));
    }

    #[test]
    fn export_accepts_shared_flags() {
        let cli = Cli::try_parse_from([
            "kinetic-studio",
            "export",
            "--export",
            "out.svg",
            "--frames",
            "30",
            "--width",
            "320",
            "--count",
            "12",
        ])
        .unwrap();
        let Some(Command::Export { out, frames }) = cli.command else { panic!("expected export") };
        assert_eq!(out, PathBuf::from("out.svg"));
        assert_eq!(frames, 30);
        let cfg = cli.demo.to_config();
        assert_eq!(cfg.width, 320.0);
        assert_eq!(cfg.count, 12);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let err = Cli::try_parse_from(["kinetic-studio", "--renderer", "opengl"]).unwrap_err();
        assert!(err.to_string().contains("unknown renderer `opengl`"));
    }
}
