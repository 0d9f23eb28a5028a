//! Command line arguments for the demo binaries

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Command, CommandFactory, FromArgMatches, Parser};

/// Which medical demo is parsing its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicalDemo {
    Skin,
    SkinAndBone,
}

impl MedicalDemo {
    pub fn name(self) -> &'static str {
        match self {
            MedicalDemo::Skin => "medical1",
            MedicalDemo::SkinAndBone => "medical2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MedicalDemo::Skin => "The skin extracted from a CT dataset of the head.",
            MedicalDemo::SkinAndBone => {
                "The skin and bone is extracted from a CT dataset of the head."
            }
        }
    }

    pub fn epilogue(self) -> &'static str {
        match self {
            MedicalDemo::Skin => {
                "This example reads a volume dataset, extracts an isosurface that\n\
                 represents the skin and displays it."
            }
            MedicalDemo::SkinAndBone => {
                "This example reads a volume dataset, extracts two isosurfaces that\n\
                 represent the skin and bone, and then displays it."
            }
        }
    }
}

/// Arguments of the medical demos: the volume to load
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version)]
pub struct MedicalArgs {
    /// MetaImage volume, e.g. FullHead.mhd
    pub filename: PathBuf,
}

impl MedicalArgs {
    /// The parser with `demo`'s name, description and epilogue
    pub fn command_for(demo: MedicalDemo) -> Command {
        Self::command()
            .name(demo.name())
            .about(demo.description())
            .after_help(demo.epilogue())
    }

    pub fn try_parse_for<I, T>(demo: MedicalDemo, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command_for(demo);
        let matches = command.try_get_matches_from_mut(args)?;
        Self::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
    }

    /// Parses the process arguments, exiting with usage on error
    pub fn parse_for(demo: MedicalDemo) -> Self {
        Self::try_parse_for(demo, std::env::args_os()).unwrap_or_else(|e| e.exit())
    }
}

/// Arguments of the procedural demos, which only offer help and version
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Quadric isosurfaces, cutting planes and contour lines")]
pub struct DemoArgs {}
