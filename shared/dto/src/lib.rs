//! Wire types for the property API: request bodies with their validation
//! rules, whitelisted partial-update payloads, and response shapes.

pub mod patch;
pub mod requests;
pub mod responses;
pub mod validation;

pub use patch::{parse_patch, Patch, PatchError, PropertyPatch, TenantPatch, UserPatch};
pub use requests::{
    CreatePropertyRequest, CreateTenantRequest, DeleteAccountRequest, LoginRequest, SignupRequest,
};
pub use responses::{AuthStatus, Message, TenantSummary, UserSummary};
pub use validation::FieldError;
