use crate::patient::PatientId;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] triage_types::TextError),
    #[error("patient {0} not found")]
    NotFound(PatientId),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete patient file: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("failed to serialize report: {0}")]
    ReportSerialization(serde_json::Error),
    #[error("patient store lock poisoned")]
    StoreLockPoisoned,
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
