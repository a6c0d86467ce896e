//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.
//! 저장되는 해시는 PHC 문자열 형식으로 알고리즘, 버전, 비용 파라미터, 솔트를 포함합니다.

use std::fmt;
use std::sync::{Arc, OnceLock};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// 존재하지 않는 사용자 검증에 쓰는 해시의 원문.
const DUMMY_SECRET: &str = "access-control-dummy-credential";

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("잘못된 해싱 파라미터: {0}")]
    InvalidParams(String),
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 정책 위반: {0}")]
    WeakPassword(&'static str),
}

/// Argon2 비용 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬도
    pub parallelism: u32,
}

impl Default for Argon2Params {
    /// OWASP 권장 Argon2id 기본값 (19 MiB, 2회, 병렬도 1)
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// 자격증명 해셔.
///
/// 여러 태스크에서 동시에 사용할 수 있습니다.
#[derive(Clone)]
pub struct CredentialHasher {
    params: Argon2Params,
    argon2: Argon2<'static>,
    dummy_hash: Arc<OnceLock<String>>,
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("params", &self.params)
            .finish()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Argon2Params::default(),
            argon2: Argon2::default(),
            dummy_hash: Arc::default(),
        }
    }
}

impl CredentialHasher {
    /// 지정한 비용 파라미터로 해셔 생성.
    ///
    /// 파라미터가 Argon2 허용 범위를 벗어나면 에러를 반환합니다.
    pub fn with_params(params: Argon2Params) -> Result<Self, PasswordError> {
        let argon2 = params.to_argon2()?;
        Ok(Self {
            params,
            argon2,
            dummy_hash: Arc::default(),
        })
    }

    /// 현재 비용 파라미터.
    pub fn params(&self) -> Argon2Params {
        self.params
    }

    /// 비밀번호 해싱.
    ///
    /// 호출마다 새로운 랜덤 솔트를 생성하므로 같은 입력이라도 결과가 다릅니다.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let hash = hasher.hash("my_secure_password")?;
    /// // "$argon2id$v=19$m=19456,t=2,p=1$..."
    /// ```
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|_| PasswordError::HashingFailed)?;

        Ok(hash.to_string())
    }

    /// 비밀번호 검증.
    ///
    /// 저장된 해시에 포함된 파라미터와 솔트로 다시 계산한 뒤 상수 시간 비교합니다.
    /// 해시 형식이 잘못된 경우에도 에러 대신 `false`를 반환합니다.
    pub fn verify(&self, secret: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };

        self.argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }

    /// 저장된 해시가 없어도 같은 비용의 검증을 수행.
    ///
    /// 해시가 없으면 현재 파라미터로 만든 더미 해시를 검증하고 항상 `false`를 반환합니다.
    /// 사용자 존재 여부가 응답 시간으로 드러나지 않게 합니다.
    pub fn verify_optional(&self, secret: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash {
            Some(hash) => self.verify(secret, hash),
            None => {
                let _ = self.verify(secret, self.dummy_hash());
                false
            }
        }
    }

    /// 현재 파라미터로 만든 더미 해시. 처음 호출할 때 한 번 계산됩니다.
    pub fn dummy_hash(&self) -> &str {
        self.dummy_hash
            .get_or_init(|| self.hash(DUMMY_SECRET).unwrap_or_default())
            .as_str()
    }

    /// 저장된 해시를 현재 파라미터로 다시 만들어야 하는지 확인.
    ///
    /// 알고리즘이나 비용 파라미터가 현재 설정과 다르면 `true`입니다.
    /// 형식이 잘못된 해시도 `true`로 취급합니다.
    pub fn needs_rehash(&self, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return true;
        };

        if !matches!(Algorithm::try_from(parsed.algorithm), Ok(Algorithm::Argon2id)) {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(params) => {
                params.m_cost() != self.params.memory_kib
                    || params.t_cost() != self.params.iterations
                    || params.p_cost() != self.params.parallelism
            }
            Err(_) => true,
        }
    }
}

/// 비밀번호 강도 검증.
///
/// 자격증명 생성 또는 변경 시 사용합니다.
///
/// # 요구사항
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < 8 {
        return Err(PasswordError::WeakPassword("비밀번호는 최소 8자 이상이어야 합니다"));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::WeakPassword(
            "비밀번호에 최소 1개의 숫자가 포함되어야 합니다",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(PasswordError::WeakPassword(
            "비밀번호에 최소 1개의 영문자가 포함되어야 합니다",
        ));
    }

    Ok(())
}
