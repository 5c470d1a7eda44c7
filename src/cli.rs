// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use examshuffle_core::error::Fallible;

use crate::cmd::AttemptSpec;
use crate::cmd::check::check_exam;
use crate::cmd::grade::grade_attempt;
use crate::cmd::present::Audience;
use crate::cmd::present::present_exam;
use crate::config::Config;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file. By default, the secret is read from the
    /// EXAMSHUFFLE_SECRET environment variable.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print an exam the way a student sees it on a given attempt.
    Student {
        /// Path to the exam JSON file.
        exam: PathBuf,
        #[command(flatten)]
        attempt: AttemptArgs,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print an exam the way an instructor sees a student's attempt, with the
    /// answer key in the student's option order.
    Instructor {
        /// Path to the exam JSON file.
        exam: PathBuf,
        #[command(flatten)]
        attempt: AttemptArgs,
        /// Leave out the per-question shuffle audit record.
        #[arg(long)]
        no_debug: bool,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Grade a submission recorded in the student's option order.
    Grade {
        /// Path to the exam JSON file.
        exam: PathBuf,
        /// Path to the submission JSON file.
        answers: PathBuf,
        #[command(flatten)]
        attempt: AttemptArgs,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check an exam for malformed questions and answer keys.
    Check {
        /// Path to the exam JSON file.
        exam: PathBuf,
    },
}

#[derive(Args)]
struct AttemptArgs {
    /// The student's identifier.
    #[arg(long)]
    student: String,
    /// The attempt number, starting at 1.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    attempt: u32,
}

impl From<AttemptArgs> for AttemptSpec {
    fn from(args: AttemptArgs) -> Self {
        AttemptSpec {
            student_id: args.student,
            attempt_number: args.attempt,
        }
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    // Only commands that shuffle need a secret.
    let load_config = || Config::load(cli.config.as_deref());
    match cli.command {
        Command::Student {
            exam,
            attempt,
            output,
        } => {
            let config = load_config()?;
            present_exam(
                &config,
                &exam,
                attempt.into(),
                Audience::Student,
                output.as_deref(),
            )
        }
        Command::Instructor {
            exam,
            attempt,
            no_debug,
            output,
        } => {
            let config = load_config()?;
            let audience = Audience::Instructor {
                include_debug: !no_debug,
            };
            present_exam(&config, &exam, attempt.into(), audience, output.as_deref())
        }
        Command::Grade {
            exam,
            answers,
            attempt,
            output,
        } => {
            let config = load_config()?;
            grade_attempt(&config, &exam, &answers, attempt.into(), output.as_deref())
        }
        Command::Check { exam } => check_exam(&exam),
    }
}
