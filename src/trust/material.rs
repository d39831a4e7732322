use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use rustls::pki_types::pem::{self, PemObject};
use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;
use tracing::warn;

use crate::errors::TrustError;

/// Raw PEM bytes as read from the CA source.
#[derive(Clone, PartialEq, Eq)]
pub struct TrustMaterial {
    pem: Bytes,
}

impl TrustMaterial {
    pub fn new(pem: impl Into<Bytes>) -> Self {
        Self { pem: pem.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pem
    }

    pub fn len(&self) -> usize {
        self.pem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pem.is_empty()
    }
}

impl fmt::Debug for TrustMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrustMaterial([{} bytes PEM])", self.pem.len())
    }
}

/// Root certificates seeded from resolved PEM material.
///
/// Keeps the PEM bytes it was built from, unmodified.
#[derive(Clone)]
pub struct TrustStore {
    pem: Bytes,
    roots: Arc<RootCertStore>,
}

impl TrustStore {
    /// Parse every certificate in `material` into a root store.
    ///
    /// Fails when the bytes hold no certificate the TLS library accepts as a
    /// trust anchor. Non-certificate PEM sections are skipped, as are
    /// certificate sections that do not decode, so long as at least one
    /// anchor remains.
    pub fn from_material(material: TrustMaterial) -> Result<Self, TrustError> {
        let mut certs = Vec::new();
        let mut malformed = 0usize;
        for block in pem_blocks(material.as_bytes()) {
            match CertificateDer::from_pem_slice(&block) {
                Ok(cert) => certs.push(cert),
                Err(pem::Error::NoItemsFound) => {}
                Err(err) => {
                    malformed += 1;
                    warn!(
                        skipped = malformed,
                        error = %err,
                        "Skipped malformed PEM block in CA bundle"
                    );
                }
            }
        }

        if certs.is_empty() {
            if malformed > 0 {
                return Err(TrustError::invalid_material(format!(
                    "all {malformed} PEM certificate blocks are malformed"
                )));
            }
            return Err(TrustError::invalid_material("no PEM certificates found"));
        }

        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(certs);
        if added == 0 {
            return Err(TrustError::invalid_material(format!(
                "none of the {ignored} certificates could be used as a trust anchor"
            )));
        }
        if ignored > 0 {
            warn!(added, ignored, "Skipped unparseable certificates in CA bundle");
        }

        Ok(Self { pem: material.pem, roots: Arc::new(roots) })
    }

    /// The exact bytes the store was built from.
    pub fn pem(&self) -> &[u8] {
        &self.pem
    }

    pub fn roots(&self) -> &RootCertStore {
        &self.roots
    }

    /// Shared handle for handing to a TLS client config.
    pub fn root_store(&self) -> Arc<RootCertStore> {
        Arc::clone(&self.roots)
    }

    /// Number of trust anchors.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Split a PEM bundle into its `-----BEGIN`/`-----END` sections.
///
/// Text outside sections is dropped. An unterminated trailing section is kept
/// so the decoder can report it.
fn pem_blocks(bundle: &[u8]) -> Vec<Vec<u8>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<u8>> = None;

    for line in bundle.split(|b| *b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.starts_with(b"-----BEGIN ") {
            current = Some(Vec::new());
        }
        if let Some(block) = current.as_mut() {
            block.extend_from_slice(line);
            block.push(b'\n');
        }
        if line.starts_with(b"-----END ") {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
        }
    }
    blocks.extend(current);
    blocks
}

impl fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustStore")
            .field("anchors", &self.roots.len())
            .field("pem", &format!("[{} bytes PEM]", self.pem.len()))
            .finish()
    }
}
