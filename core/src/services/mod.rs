//! Business services containing domain logic and use cases.

pub mod credentials;
pub mod notification;
pub mod registration;
pub mod session;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use credentials::{BcryptPasswordHasher, PasswordHasher};
pub use notification::{
    stop_worker, EmailTransport, MessageOutcome, NotificationDispatcher, NotificationWorker,
    NotificationWorkerConfig, TaskQueue, WorkerStats,
};
pub use registration::{AccountReplicator, NoopReplicator, RegistrationRequest, RegistrationService};
pub use session::{BearerValidator, SessionService};
pub use token::{TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig};
pub use verification::{SmsSender, VerificationService, VerificationServiceConfig};
