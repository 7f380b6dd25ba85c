//! Pure RBAC decision functions. No I/O: the caller fetches the resource,
//! this module answers whether the actor may act on it.
//!
//! Evaluation priority: self-action guard (user-targeted admin actions),
//! then ownership, then role gate. User management sits behind the
//! super-admin flag, a stricter tier than the ADMIN role.

use crate::types::enums::{OcorrenciaStatus, UserTipo};
use crate::types::internal::Actor;

/// Operations subject to an allow/deny decision
#[derive(Debug, Clone)]
pub enum Action<'a> {
    CreateOcorrencia,
    ViewOcorrencia {
        owner_id: &'a str,
    },
    UpdateOcorrenciaStatus,
    DeleteOcorrencia {
        owner_id: &'a str,
        status: OcorrenciaStatus,
    },
    ViewStats,
    ManageUsers,
}

pub fn allowed(actor: &Actor, action: &Action<'_>) -> bool {
    match action {
        Action::CreateOcorrencia => actor.tipo == UserTipo::Vereador,
        Action::ViewOcorrencia { owner_id } => match actor.tipo {
            UserTipo::Admin | UserTipo::Juridico => true,
            UserTipo::Vereador => actor.id == *owner_id,
        },
        Action::UpdateOcorrenciaStatus | Action::ViewStats => {
            matches!(actor.tipo, UserTipo::Admin | UserTipo::Juridico)
        }
        Action::DeleteOcorrencia { owner_id, status } => match actor.tipo {
            UserTipo::Admin => true,
            UserTipo::Vereador => {
                actor.id == *owner_id && *status == OcorrenciaStatus::Pendente
            }
            UserTipo::Juridico => false,
        },
        Action::ManageUsers => actor.is_super_admin,
    }
}

/// An actor may never deactivate, delete, or change the role of their own
/// account, regardless of privileges.
pub fn is_self_action(actor: &Actor, target_user_id: &str) -> bool {
    actor.id == target_user_id
}
