//! License service: issue, verify and list license records.
//!
//! Every operation runs a full load → decide/mutate → save cycle against the
//! [`RecordStore`]. Cycles are serialized within the process by a single
//! mutex; writers in other processes can still interleave (last writer wins).

use std::sync::{Arc, Mutex, MutexGuard};

use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::id::{KeyFormat, is_valid_supplied_key};
use crate::models::{CreateLicense, DEFAULT_OWNER, License, key_hint};
use crate::store::{RecordStore, StoreError};

#[derive(Error, Debug)]
pub enum LicenseError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("key already exists")]
    KeyExists,

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Why a verification was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    MissingKey,
    NotFound,
    Deactivated,
    Expired,
    IpNotAuthorized {
        authorized_ip: String,
        observed_ip: String,
    },
}

impl InvalidReason {
    /// Client-facing reason string.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingKey => "missing key",
            Self::NotFound => "key not found",
            Self::Deactivated => "license deactivated",
            Self::Expired => "license expired",
            Self::IpNotAuthorized { .. } => "IP not authorized",
        }
    }
}

/// Outcome of verifying a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid { owner: String },
    Invalid(InvalidReason),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

pub struct LicenseService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    admin_token: String,
    key_format: KeyFormat,
    lock: Mutex<()>,
}

impl LicenseService {
    pub fn new(store: Arc<dyn RecordStore>, admin_token: impl Into<String>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            admin_token: admin_token.into(),
            key_format: KeyFormat::default(),
            lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_key_format(mut self, key_format: KeyFormat) -> Self {
        self.key_format = key_format;
        self
    }

    /// Serializes read-modify-write cycles. Poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Checks a presented admin secret in constant time.
    ///
    /// Surrounding whitespace is ignored whatever the source (header, body
    /// field or query parameter), matching how the configured token is read.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), LicenseError> {
        let presented = presented
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(LicenseError::Unauthorized)?;
        let matches: bool = presented
            .as_bytes()
            .ct_eq(self.admin_token.as_bytes())
            .into();
        if matches {
            Ok(())
        } else {
            tracing::warn!("Rejected admin request: token mismatch");
            Err(LicenseError::Unauthorized)
        }
    }

    /// Issues a new license.
    pub fn create(
        &self,
        presented_token: Option<&str>,
        input: CreateLicense,
    ) -> Result<License, LicenseError> {
        self.authorize(presented_token)?;

        let key = match input.key.as_deref() {
            Some(k) if !k.is_empty() => {
                if !is_valid_supplied_key(k) {
                    return Err(LicenseError::InvalidKey(
                        "key must be at most 256 characters with no whitespace".into(),
                    ));
                }
                k.to_string()
            }
            _ => self.key_format.generate(),
        };

        let _guard = self.lock();
        let mut licenses = self.store.load();

        if licenses.iter().any(|l| l.key == key) {
            tracing::info!("Rejected create: key {} already exists", key_hint(&key));
            return Err(LicenseError::KeyExists);
        }

        let now = self.clock.now_ms();
        let expires_at = input.validity_ms().map(|ms| now.saturating_add(ms));
        let license = License {
            key,
            owner: input.owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            bound_ip: input.ip.filter(|ip| !ip.is_empty()),
            created_at: now,
            expires_at,
            active: true,
            notes: String::new(),
        };

        licenses.push(license.clone());
        self.store.save(&licenses)?;

        tracing::info!(
            "Created license {} for {} (expires_at: {:?}, bound_ip: {:?})",
            license.key_hint(),
            license.owner,
            license.expires_at,
            license.bound_ip
        );
        Ok(license)
    }

    /// Verifies a key for a client address. First matching rule wins:
    /// missing key, unknown key, inactive, expired (deactivates), then IP
    /// binding on first use or IP mismatch.
    pub fn verify(
        &self,
        key: Option<&str>,
        client_ip: Option<&str>,
    ) -> Result<Verification, LicenseError> {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Ok(Verification::Invalid(InvalidReason::MissingKey));
        };
        let client_ip = client_ip.filter(|ip| !ip.is_empty());

        let _guard = self.lock();
        let mut licenses = self.store.load();

        let Some(license) = licenses.iter_mut().find(|l| l.key == key) else {
            tracing::debug!("Verify {}: key not found", key_hint(key));
            return Ok(Verification::Invalid(InvalidReason::NotFound));
        };

        if !license.active {
            tracing::debug!("Verify {}: deactivated", license.key_hint());
            return Ok(Verification::Invalid(InvalidReason::Deactivated));
        }

        if license.is_expired_at(self.clock.now_ms()) {
            license.active = false;
            tracing::info!("License {} expired, deactivating", license.key_hint());
            self.store.save(&licenses)?;
            return Ok(Verification::Invalid(InvalidReason::Expired));
        }

        match (license.bound_ip.clone(), client_ip) {
            (None, Some(ip)) => {
                license.bound_ip = Some(ip.to_string());
                let owner = license.owner.clone();
                tracing::info!("Bound license {} to {}", license.key_hint(), ip);
                self.store.save(&licenses)?;
                Ok(Verification::Valid { owner })
            }
            (Some(bound), Some(ip)) if bound != ip => {
                tracing::info!(
                    "Verify {}: IP {} not authorized (bound to {})",
                    license.key_hint(),
                    ip,
                    bound
                );
                Ok(Verification::Invalid(InvalidReason::IpNotAuthorized {
                    authorized_ip: bound,
                    observed_ip: ip.to_string(),
                }))
            }
            _ => Ok(Verification::Valid {
                owner: license.owner.clone(),
            }),
        }
    }

    /// Returns every record, including keys.
    pub fn list(&self, presented_token: Option<&str>) -> Result<Vec<License>, LicenseError> {
        self.authorize(presented_token)?;
        let _guard = self.lock();
        Ok(self.store.load())
    }
}
