//! # Notary Adapter
//!
//! Runtime implementation of `NotaryGateway` over the in-process
//! `NotaryService`.

use async_trait::async_trait;
use iou_01_contract::{FinalizedTransaction, SignedTransaction};
use iou_02_issuance::{NotaryGateway, NotaryGatewayError};
use iou_03_notary::{NotaryApi, NotaryError, NotaryService};
use shared_types::Party;
use std::sync::Arc;

/// Forwards notarisation requests to a local notary.
#[derive(Clone)]
pub struct NotaryAdapter {
    notary: Arc<NotaryService>,
}

impl NotaryAdapter {
    pub fn new(notary: Arc<NotaryService>) -> Self {
        Self { notary }
    }

    /// The notary's well-known identity.
    pub fn identity(&self) -> &Party {
        self.notary.identity()
    }
}

#[async_trait]
impl NotaryGateway for NotaryAdapter {
    async fn notarise(
        &self,
        stx: SignedTransaction,
    ) -> Result<FinalizedTransaction, NotaryGatewayError> {
        self.notary.notarise(stx).await.map_err(|e| match e {
            NotaryError::Conflict { conflicts, .. } => NotaryGatewayError::Conflict {
                conflicts: conflicts.into_iter().map(|(state, _)| state).collect(),
            },
            other => NotaryGatewayError::Rejected {
                reason: other.to_string(),
            },
        })
    }
}
