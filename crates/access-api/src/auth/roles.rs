//! 역할 기반 접근 제어 (RBAC).
//!
//! 역할은 guest < user < manager < admin 순서의 단일 선형 권한 체계입니다.
//! 알 수 없는 역할 문자열은 가장 낮은 등급(guest)으로 취급합니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 게스트 - 최소 권한
    Guest,
    /// 일반 사용자 - 본인 정보 및 출입 기록 조회
    User,
    /// 관리자 - 장치, 출입 수단, 알람 관리
    Manager,
    /// 시스템 관리자 - 모든 권한 보유
    Admin,
}

impl Role {
    /// 알려진 모든 역할 (낮은 등급부터).
    pub const ALL: [Role; 4] = [Role::Guest, Role::User, Role::Manager, Role::Admin];

    /// 역할의 등급 반환 (높을수록 더 많은 권한).
    pub fn rank(&self) -> u8 {
        match self {
            Role::Guest => 0,
            Role::User => 1,
            Role::Manager => 2,
            Role::Admin => 3,
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "guest" => Some(Role::Guest),
            "user" => Some(Role::User),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 문자열에서 역할 변환. 알 수 없는 값은 [`Role::Guest`].
    pub fn from_label(s: &str) -> Self {
        Self::parse(s).unwrap_or(Role::Guest)
    }

    /// 요구 역할 이상인지 확인.
    pub fn satisfies(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// 역할이 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.satisfies(permission.required_role())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// 역할 문자열의 등급. 알 수 없는 역할은 0.
pub fn rank_of(role: &str) -> u8 {
    Role::from_label(role).rank()
}

/// 실제 역할이 요구 역할 이상인지 판정.
///
/// 부수 효과가 없으며 실패하지 않습니다.
///
/// ```
/// use access_api::auth::authorize;
///
/// assert!(authorize("admin", "guest"));
/// assert!(!authorize("guest", "admin"));
/// assert!(!authorize("bogus", "user"));
/// ```
pub fn authorize(actual_role: &str, required_role: &str) -> bool {
    rank_of(actual_role) >= rank_of(required_role)
}

/// 시스템 권한.
///
/// 각 작업에 필요한 최소 역할을 정의합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// 시스템 정보 조회
    ViewSystemInfo,
    /// 본인 프로필 조회
    ViewOwnProfile,
    /// 출입 기록 조회
    ViewAccessRecords,
    /// 장치 목록 조회
    ViewDevices,
    /// 장치 등록/수정
    ManageDevices,
    /// 출입 수단 (카드, 지문 등) 관리
    ManageAccessMethods,
    /// 알람 확인/처리
    HandleAlarms,
    /// 사용자 관리
    ManageUsers,
    /// 권한 정책 관리
    ManagePermissions,
}

impl Permission {
    /// 권한에 필요한 최소 역할.
    pub fn required_role(&self) -> Role {
        match self {
            Permission::ViewSystemInfo => Role::Guest,
            Permission::ViewOwnProfile
            | Permission::ViewAccessRecords
            | Permission::ViewDevices => Role::User,
            Permission::ManageDevices
            | Permission::ManageAccessMethods
            | Permission::HandleAlarms => Role::Manager,
            Permission::ManageUsers | Permission::ManagePermissions => Role::Admin,
        }
    }

    /// 권한에 대한 설명 반환.
    pub fn description(&self) -> &'static str {
        match self {
            Permission::ViewSystemInfo => "시스템 정보 조회",
            Permission::ViewOwnProfile => "본인 프로필 조회",
            Permission::ViewAccessRecords => "출입 기록 조회",
            Permission::ViewDevices => "장치 조회",
            Permission::ManageDevices => "장치 관리",
            Permission::ManageAccessMethods => "출입 수단 관리",
            Permission::HandleAlarms => "알람 처리",
            Permission::ManageUsers => "사용자 관리",
            Permission::ManagePermissions => "권한 정책 관리",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_reflexive() {
        for role in Role::ALL {
            let label = role.to_string();
            assert!(authorize(&label, &label), "{} should satisfy itself", label);
        }
    }

    #[test]
    fn test_authorize_ordering() {
        assert!(authorize("admin", "guest"));
        assert!(authorize("admin", "manager"));
        assert!(authorize("manager", "user"));
        assert!(!authorize("manager", "admin"));
        assert!(!authorize("guest", "admin"));
        assert!(!authorize("user", "manager"));
    }

    #[test]
    fn test_unknown_roles_are_least_privileged() {
        assert!(!authorize("bogus", "user"));
        assert!(!authorize("", "user"));
        assert!(!authorize("superuser", "admin"));
        assert!(authorize("bogus", "guest"));
        assert_eq!(rank_of("root"), 0);
    }

    #[test]
    fn test_role_rank() {
        assert!(Role::Admin.rank() > Role::Manager.rank());
        assert!(Role::Manager.rank() > Role::User.rank());
        assert!(Role::User.rank() > Role::Guest.rank());
        assert_eq!(Role::Guest.rank(), 0);
        assert_eq!(Role::Admin.rank(), 3);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("MANAGER"), Some(Role::Manager));
        assert_eq!(Role::parse(" User "), Some(Role::User));
        assert_eq!(Role::parse("unknown"), None);
        assert_eq!(Role::from_label("unknown"), Role::Guest);
    }

    #[test]
    fn test_role_permissions() {
        // Admin은 모든 권한 보유
        assert!(Role::Admin.has_permission(Permission::ManageUsers));
        assert!(Role::Admin.has_permission(Permission::ManagePermissions));

        // Manager는 장치/알람 관리까지
        assert!(Role::Manager.has_permission(Permission::ManageDevices));
        assert!(Role::Manager.has_permission(Permission::HandleAlarms));
        assert!(!Role::Manager.has_permission(Permission::ManageUsers));

        // User는 조회만
        assert!(Role::User.has_permission(Permission::ViewAccessRecords));
        assert!(!Role::User.has_permission(Permission::ManageDevices));

        // Guest는 시스템 정보만
        assert!(Role::Guest.has_permission(Permission::ViewSystemInfo));
        assert!(!Role::Guest.has_permission(Permission::ViewOwnProfile));
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Manager).unwrap();
        assert_eq!(json, "\"manager\"");

        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Manager);
    }
}
