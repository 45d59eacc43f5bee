//! Read-only queries, including the signed eligibility check.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fast_store::KvStore;
use fast_types::{AccountAddress, Amount, FastClient, FastUser, Params, PubKey};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::error::FastError;
use crate::keeper::Keeper;

pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Page through a listing. `key` resumes after the given user id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub key: Option<String>,
    /// Zero means [`DEFAULT_PAGE_LIMIT`].
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub count_total: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Pass as `key` to fetch the next page; `None` on the last page.
    pub next_key: Option<String>,
    /// Total entries, when `count_total` was requested.
    pub total: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UsersPage {
    pub users: Vec<FastUser>,
    pub pagination: PageResponse,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub user_credits: Amount,
    /// Current block height, not the height in the payload.
    pub block_height: u64,
}

/// `keccak256(be_u64(height) || keccak256(user_id) || chain_id)`.
pub fn eligibility_hash(block_height: u64, user_id: &str, chain_id: &str) -> [u8; 32] {
    let user_hash = Keccak256::digest(user_id.as_bytes());
    let mut hasher = Keccak256::new();
    hasher.update(block_height.to_be_bytes());
    hasher.update(user_hash);
    hasher.update(chain_id.as_bytes());
    hasher.finalize().into()
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, FastError> {
    RecoveryId::from_byte(v)
        .filter(|id| !id.is_x_reduced())
        .ok_or_else(|| FastError::InvalidRequest(format!("invalid recovery id {v}")))
}

/// Recover the compressed SEC1 public key that produced a 65-byte
/// `r || s || v` signature over `hash`.
pub fn recover_compressed_key(hash: &[u8; 32], signature: &[u8]) -> Result<PubKey, FastError> {
    if signature.len() != 65 {
        return Err(FastError::InvalidRequest(format!(
            "signature is {} bytes, expected 65",
            signature.len()
        )));
    }
    let recovery_id = parse_recovery_id(signature[64])?;
    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| FastError::InvalidRequest(format!("invalid signature: {e}")))?;
    let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
        .map_err(|e| FastError::InvalidRequest(format!("signature recovery failed: {e}")))?;
    Ok(PubKey::new(key.to_encoded_point(true).as_bytes().to_vec()))
}

impl Keeper {
    pub fn query_params<S: KvStore + ?Sized>(&self, kv: &S) -> Result<Params, FastError> {
        self.params(kv)
    }

    pub fn query_fast_client<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        public_key: &PubKey,
    ) -> Result<FastClient, FastError> {
        self.get_client(kv, public_key)
    }

    /// The pending new owner of a client.
    pub fn query_fast_client_transfer<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        public_key: &PubKey,
    ) -> Result<AccountAddress, FastError> {
        let client = self.get_client(kv, public_key)?;
        self.schema.transfers.get(kv, &client.id)?.ok_or_else(|| {
            FastError::NotFound(format!(
                "no fast client transfer pending for {public_key}"
            ))
        })
    }

    pub fn query_fast_client_user<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        public_key: &PubKey,
        user_id: &str,
    ) -> Result<FastUser, FastError> {
        let client = self.get_client(kv, public_key)?;
        self.get_user(kv, client.id, user_id)
    }

    /// Users of one client in user-id byte order.
    pub fn query_fast_client_users<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        public_key: &PubKey,
        page: &PageRequest,
    ) -> Result<UsersPage, FastError> {
        let client = self.get_client(kv, public_key)?;
        let all = self
            .schema
            .users
            .iter_encoded_prefix(kv, &client.id.to_be_bytes())?;
        let total = page.count_total.then_some(all.len() as u64);

        let limit = if page.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            page.limit
        } as usize;

        let mut remaining = all
            .into_iter()
            .map(|(_, user)| user)
            .filter(|user| match &page.key {
                Some(after) => user.user_id.as_str() > after.as_str(),
                None => true,
            })
            .peekable();

        let mut users = Vec::with_capacity(limit.min(64));
        while users.len() < limit {
            match remaining.next() {
                Some(user) => users.push(user),
                None => break,
            }
        }
        let next_key = match (remaining.peek(), users.last()) {
            (Some(_), Some(last)) => Some(last.user_id.clone()),
            _ => None,
        };

        Ok(UsersPage {
            users,
            pagination: PageResponse { next_key, total },
        })
    }

    /// Check a user's signed eligibility payload.
    ///
    /// `payload_b64` is base64 of `"{block_height}:{user_id}:{signature_hex}"`.
    /// The signature must recover to the public key of a registered client
    /// that has `user_id` as a user.
    pub fn query_fast_client_eligibility<S: KvStore + ?Sized>(
        &self,
        kv: &S,
        payload_b64: &str,
        current_height: u64,
    ) -> Result<EligibilityResponse, FastError> {
        let payload = BASE64
            .decode(payload_b64)
            .map_err(|e| FastError::InvalidRequest(format!("invalid base64 in payload: {e}")))?;
        let payload = String::from_utf8(payload)
            .map_err(|e| FastError::InvalidRequest(format!("payload is not utf-8: {e}")))?;

        let parts: Vec<&str> = payload.split(':').collect();
        let [height, user_id, signature] = parts.as_slice() else {
            return Err(FastError::InvalidRequest(format!(
                "expected 3 payload parts, got {}",
                parts.len()
            )));
        };
        let height: u64 = height
            .parse()
            .map_err(|_| FastError::InvalidRequest(format!("invalid block height: {height}")))?;
        let signature = hex::decode(signature)
            .map_err(|_| FastError::InvalidRequest(format!("invalid hex in signature: {signature}")))?;

        let hash = eligibility_hash(height, user_id, self.chain_id());
        let public_key = recover_compressed_key(&hash, &signature)?;
        debug!(%public_key, user_id = %user_id, height, "eligibility signature recovered");

        let client = self.get_client(kv, &public_key)?;
        let user = self.get_user(kv, client.id, user_id)?;

        Ok(EligibilityResponse {
            eligible: true,
            user_credits: user.credits,
            block_height: current_height,
        })
    }
}
