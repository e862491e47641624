//! View/state layer of VendorConnect: the hosted-backend client, the
//! session store, dashboard state with its fetcher and mutations, and the
//! text views.

pub mod api_client;
pub mod backend;
pub mod clock;
pub mod components;
pub mod error;
pub mod forms;
pub mod mutations;
pub mod router;
pub mod session;
pub mod settings;
pub mod state;

#[cfg(any(test, feature = "testing"))]
pub mod mock_backend;

pub use api_client::SupabaseClient;
pub use backend::{AuthService, Order, SignUpOutcome, SortDirection, StorageService, Table};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ClientError;
pub use forms::{ContractForm, Credentials, FormError, VendorForm};
pub use mutations::{MutationError, ReportOutcome};
pub use router::View;
pub use session::{SessionFile, SessionStore, SessionSubscription};
pub use settings::ClientSettings;
pub use state::{Dashboard, Modal};
