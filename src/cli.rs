//! CLI interface for the resume scorer

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-scorer")]
#[command(about = "Resume extraction and explainable job-match scoring")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a structured candidate profile from a resume
    Extract {
        /// Path to resume file (PDF or DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Declared media type, used when the extension is ambiguous
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Score a resume against a job's requirements
    Score {
        /// Path to resume file (PDF or DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to a JSON job requirement, or plain-text job description
        #[arg(short, long)]
        job: PathBuf,

        /// Declared media type, used when the extension is ambiguous
        #[arg(long)]
        media_type: Option<String>,
    },
}
