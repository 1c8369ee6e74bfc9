use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use nirogya_core::{
    config::patient_data_dir_from_env_value, open_file_store, CoreConfig, JsonFileBackend,
    PatientDraft, PatientId, PatientPatch, PatientRecord, PatientStatus, PatientStore,
    StatusFilter,
};
use nirogya_prediction::{PredictionClient, PredictionConfig, PredictionRequest};

#[derive(Parser)]
#[command(name = "nirogya")]
#[command(about = "Nirogya doctor dashboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients in submission order
    List {
        /// Case-insensitive text to match against name, phone, email and symptoms
        #[arg(long)]
        query: Option<String>,
        /// `all` or one of incoming, in-progress, completed, cancelled
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Show a single patient
    Show {
        /// Patient id, e.g. PAT-1731661200123
        id: String,
    },
    /// Record a new patient intake
    Add {
        name: String,
        phone: String,
        symptoms: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Initial status (defaults to incoming)
        #[arg(long)]
        status: Option<String>,
    },
    /// Edit a patient's details; an empty email or address clears it
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        symptoms: Option<String>,
    },
    /// Move a patient to another status
    SetStatus { id: String, status: String },
    /// Per-status totals
    Counts,
    /// Regions the prediction model accepts
    Regions,
    /// Diseases the prediction model accepts
    Diseases,
    /// Prediction service status
    Health,
    /// Forecast next-day cases from the last 7 daily counts (oldest first)
    Predict {
        region: String,
        disease: String,
        #[arg(num_args = 7, required = true)]
        cases: Vec<f64>,
        /// Forecast date (YYYY-MM-DD); the service defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

fn open_store() -> Result<PatientStore<JsonFileBackend>, Box<dyn std::error::Error>> {
    let dir = patient_data_dir_from_env_value(std::env::var("PATIENT_DATA_DIR").ok());
    let cfg = CoreConfig::new(dir)?;
    Ok(open_file_store(&cfg)?)
}

fn prediction_client() -> Result<PredictionClient, Box<dyn std::error::Error>> {
    let cfg = PredictionConfig::from_env_values(
        std::env::var("PREDICTION_API_URL").ok(),
        std::env::var("PREDICTION_TIMEOUT_SECS").ok(),
    )?;
    Ok(PredictionClient::new(&cfg)?)
}

fn print_patient(patient: &PatientRecord) {
    println!(
        "ID: {}, Name: {}, Phone: {}, Status: {}, Submitted: {}",
        patient.id, patient.name, patient.phone, patient.status, patient.submitted_at
    );
    if let Some(email) = &patient.email {
        println!("  Email: {}", email);
    }
    if let Some(address) = &patient.address {
        println!("  Address: {}", address);
    }
    println!("  Symptoms: {}", patient.symptoms);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { query, status }) => {
            let filter: StatusFilter = status.parse()?;
            let store = open_store()?;
            let patients = store.query(query.as_deref().unwrap_or(""), filter);
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    print_patient(patient);
                }
            }
        }
        Some(Commands::Show { id }) => {
            let id = PatientId::parse(&id)?;
            let store = open_store()?;
            match store.get(&id) {
                Ok(patient) => print_patient(patient),
                Err(e) => eprintln!("Error showing patient: {}", e),
            }
        }
        Some(Commands::Add {
            name,
            phone,
            symptoms,
            email,
            address,
            status,
        }) => {
            let status = status.map(|s| s.parse::<PatientStatus>()).transpose()?;
            let draft = PatientDraft {
                name,
                phone,
                symptoms,
                email,
                address,
                status,
            };
            let mut store = open_store()?;
            match store.add(draft) {
                Ok(patient) => println!("Added patient with ID: {}", patient.id),
                Err(e) => eprintln!("Error adding patient: {}", e),
            }
        }
        Some(Commands::Update {
            id,
            name,
            phone,
            email,
            address,
            symptoms,
        }) => {
            let id = PatientId::parse(&id)?;
            let patch = PatientPatch {
                name,
                phone,
                email,
                address,
                symptoms,
                status: None,
            };
            if patch.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            let mut store = open_store()?;
            match store.update(&id, &patch) {
                Ok(patient) => println!("Updated patient: {}", patient.id),
                Err(e) => eprintln!("Error updating patient: {}", e),
            }
        }
        Some(Commands::SetStatus { id, status }) => {
            let id = PatientId::parse(&id)?;
            let status: PatientStatus = status.parse()?;
            let mut store = open_store()?;
            match store.set_status(&id, status) {
                Ok(patient) => println!("Patient {} is now {}", patient.id, patient.status),
                Err(e) => eprintln!("Error changing status: {}", e),
            }
        }
        Some(Commands::Counts) => {
            let counts = open_store()?.status_counts();
            println!("Incoming: {}", counts.incoming);
            println!("In progress: {}", counts.in_progress);
            println!("Completed: {}", counts.completed);
            println!("Cancelled: {}", counts.cancelled);
            println!("Total: {}", counts.total);
        }
        Some(Commands::Regions) => match prediction_client()?.fetch_regions().await {
            Ok(regions) => regions.iter().for_each(|r| println!("{}", r)),
            Err(e) => eprintln!("Error fetching regions: {}", e),
        },
        Some(Commands::Diseases) => match prediction_client()?.fetch_diseases().await {
            Ok(diseases) => diseases.iter().for_each(|d| println!("{}", d)),
            Err(e) => eprintln!("Error fetching diseases: {}", e),
        },
        Some(Commands::Health) => match prediction_client()?.health().await {
            Ok(health) => {
                println!("Status: {}", health.status);
                println!("Model loaded: {}", health.model_loaded);
                println!(
                    "Regions: {}, Diseases: {}",
                    health.num_regions, health.num_diseases
                );
                if let Some(version) = health.model_version {
                    println!("Model version: {}", version);
                }
            }
            Err(e) => eprintln!("Error checking prediction service: {}", e),
        },
        Some(Commands::Predict {
            region,
            disease,
            cases,
            date,
        }) => {
            let mut request = PredictionRequest::new(&region, &disease, &cases)?;
            if let Some(date) = date {
                request = request.with_prediction_date(NaiveDate::parse_from_str(&date, "%Y-%m-%d")?);
            }
            match prediction_client()?.predict(&request).await {
                Ok(prediction) => {
                    println!(
                        "{} / {} on {}: {:.1} cases (interval {:.1} to {:.1})",
                        prediction.region,
                        prediction.disease,
                        prediction.prediction_date,
                        prediction.predicted_cases,
                        prediction.confidence_interval_lower,
                        prediction.confidence_interval_upper
                    );
                    println!("Model version: {}", prediction.model_version);
                }
                Err(e) => eprintln!("Error predicting cases: {}", e),
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
