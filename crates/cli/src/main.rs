use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::{
    classify, recommend, CoreConfig, JsonReportRenderer, NewPatient, NonEmptyText, PatientId,
    PatientService, ReportRenderer, StoreKind, TextReportRenderer, VitalSigns,
    DEFAULT_PATIENT_DATA_DIR,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Emergency department triage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify vital signs into a priority tier
    Classify {
        #[command(flatten)]
        vitals: VitalArgs,
    },
    /// Suggest care from clinical notes
    Recommend {
        /// Free-text notes (omit for none)
        notes: Option<String>,
    },
    /// Admit a patient
    Admit {
        /// Patient name
        name: String,
        #[command(flatten)]
        vitals: VitalArgs,
        /// Clinical notes
        #[arg(long)]
        notes: Option<String>,
        /// Mark the patient as needing surgery
        #[arg(long)]
        surgery: bool,
    },
    /// Show the worklist, most urgent first
    List,
    /// Print a patient report
    Report {
        /// Patient id
        id: u64,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Remove a patient from the worklist
    Discharge {
        /// Patient id
        id: u64,
    },
}

#[derive(clap::Args, Debug, PartialEq)]
struct VitalArgs {
    /// Heart rate (beats/min)
    #[arg(allow_negative_numbers = true)]
    heart_rate: i32,
    /// Systolic blood pressure (mmHg)
    #[arg(allow_negative_numbers = true)]
    blood_pressure: i32,
    /// Oxygen saturation (%)
    #[arg(allow_negative_numbers = true)]
    oxygen_saturation: i32,
    /// Temperature (°C)
    #[arg(allow_negative_numbers = true)]
    temperature: f64,
}

impl From<VitalArgs> for VitalSigns {
    fn from(args: VitalArgs) -> Self {
        VitalSigns::new(
            args.heart_rate,
            args.blood_pressure,
            args.oxygen_saturation,
            args.temperature,
        )
    }
}

fn patient_service() -> anyhow::Result<PatientService> {
    let patient_data_dir =
        std::env::var("PATIENT_DATA_DIR").unwrap_or_else(|_| DEFAULT_PATIENT_DATA_DIR.into());
    let cfg = Arc::new(CoreConfig::new(
        PathBuf::from(patient_data_dir),
        StoreKind::File,
        None,
    ));
    Ok(PatientService::new(cfg.open_store()?))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Classify { vitals }) => {
            let vitals = VitalSigns::from(vitals);
            let tier = classify(
                vitals.heart_rate,
                vitals.blood_pressure,
                vitals.oxygen_saturation,
                vitals.temperature,
            );
            match vitals.severity_score() {
                Some(score) => println!("{tier} (score {score})"),
                None => println!("{tier}"),
            }
        }
        Some(Commands::Recommend { notes }) => {
            println!("{}", recommend(notes.as_deref()));
        }
        Some(Commands::Admit {
            name,
            vitals,
            notes,
            surgery,
        }) => {
            let record = patient_service()?.admit(NewPatient {
                name: NonEmptyText::new(name)?,
                vitals: vitals.into(),
                notes,
                surgery_required: surgery,
            })?;
            println!("Admitted patient {} with priority {}", record.id, record.priority);
        }
        Some(Commands::List) => {
            let worklist = patient_service()?.worklist()?;
            if worklist.is_empty() {
                println!("No patients found.");
            } else {
                for entry in worklist {
                    let record = &entry.record;
                    println!(
                        "ID: {}, Name: {}, Priority: {}, Recommendation: {}",
                        record.id, record.name, record.priority, entry.recommendation
                    );
                }
            }
        }
        Some(Commands::Report { id, json }) => {
            let renderer: &dyn ReportRenderer = if json {
                &JsonReportRenderer
            } else {
                &TextReportRenderer
            };
            let rendered = patient_service()?.report(PatientId(id), renderer)?;
            println!("{}", String::from_utf8_lossy(&rendered.body).trim_end());
        }
        Some(Commands::Discharge { id }) => {
            patient_service()?.discharge(PatientId(id))?;
            println!("Discharged patient {id}");
        }
        None => {
            println!("Use 'triage --help' for commands");
        }
    }

    Ok(())
}
