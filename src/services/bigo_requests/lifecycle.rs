//! 请求生命周期
//!
//! 所有操作都显式接收当前用户，返回具名的业务错误，由 HTTP 层映射为响应。

use tracing::info;

use super::access::{ensure_access, require_moderator};
use super::calculation::{CalculationPayload, compute_result};
use crate::errors::{BigOError, Result};
use crate::models::bigo_requests::{
    entities::{BigORequest, BigORequestStatus, CalculationResult},
    requests::{BigORequestListQuery, CalculationCallbackRequest, UpdateBigORequestRequest},
    responses::{BigORequestDetailResponse, BigORequestResponse, CartResponse, DraftOutcome},
};
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 完成请求的结果；`payload` 非空时应提交给外部计算服务
#[derive(Debug, Clone)]
pub struct FinishOutcome {
    pub request: BigORequest,
    pub payload: Option<CalculationPayload>,
}

/// 读取请求：不存在为 NotFound，已删除为 NotAllowed
async fn load_request(storage: &dyn Storage, id: i64) -> Result<BigORequest> {
    let request = storage
        .get_bigo_request_by_id(id)
        .await?
        .ok_or_else(|| BigOError::not_found(format!("request {id} not found")))?;

    if request.status == BigORequestStatus::Deleted {
        return Err(BigOError::not_allowed(format!("request {id} was deleted")));
    }
    Ok(request)
}

/// 读取当前用户可访问的请求
async fn load_accessible(storage: &dyn Storage, actor: &User, id: i64) -> Result<BigORequest> {
    let request = load_request(storage, id).await?;
    ensure_access(actor, &request)?;
    Ok(request)
}

fn transition_denied(request: &BigORequest, to: BigORequestStatus) -> BigOError {
    BigOError::not_allowed(format!(
        "request {} in status {} cannot become {}",
        request.id, request.status, to
    ))
}

/// 按状态转换表执行转换
async fn transition(
    storage: &dyn Storage,
    actor: &User,
    request: BigORequest,
    to: BigORequestStatus,
) -> Result<BigORequest> {
    if !request.status.can_transition_to(to) {
        return Err(transition_denied(&request, to));
    }

    let updated = storage
        .transition_bigo_request_status(request.id, BigORequestStatus::sources_of(to), to)
        .await?
        // 读取之后状态已被并发修改
        .ok_or_else(|| transition_denied(&request, to))?;

    info!(
        "请求 {} 状态 {} -> {}（用户 {}）",
        updated.id, request.status, updated.status, actor.id
    );
    Ok(updated)
}

/// 获取或创建当前用户的草稿
pub async fn get_or_create_draft(storage: &dyn Storage, creator: &User) -> Result<DraftOutcome> {
    let outcome = storage.get_or_create_draft_request(creator.id).await?;
    if outcome.created {
        info!("为用户 {} 创建草稿 {}", creator.id, outcome.request.id);
    }
    Ok(outcome)
}

/// 当前用户的购物车概要
pub async fn cart(storage: &dyn Storage, owner: &User) -> Result<CartResponse> {
    match storage.find_draft_request(owner.id).await? {
        Some(draft) => Ok(CartResponse {
            request_id: Some(draft.id),
            compclass_count: storage.count_request_items(draft.id).await?,
        }),
        None => Ok(CartResponse::default()),
    }
}

/// 当前用户的草稿及其明细；没有草稿时返回 NoDraft
pub async fn current_draft(
    storage: &dyn Storage,
    owner: &User,
) -> Result<BigORequestDetailResponse> {
    let draft = storage
        .find_draft_request(owner.id)
        .await?
        .ok_or_else(|| BigOError::no_draft(format!("user {} has no draft request", owner.id)))?;
    get_single(storage, owner, draft.id).await
}

/// 获取单个请求及其明细
pub async fn get_single(
    storage: &dyn Storage,
    actor: &User,
    id: i64,
) -> Result<BigORequestDetailResponse> {
    let request = load_accessible(storage, actor, id).await?;
    let items = storage.list_request_items(id).await?;
    let request = with_logins(storage, vec![request])
        .await?
        .pop()
        .ok_or_else(|| BigOError::not_found(format!("request {id} not found")))?;

    Ok(BigORequestDetailResponse { request, items })
}

/// 列出请求：审核员可见全部，普通用户只可见自己的
pub async fn list(
    storage: &dyn Storage,
    actor: &User,
    query: BigORequestListQuery,
) -> Result<Vec<BigORequestResponse>> {
    let creator_filter = (!actor.is_moderator()).then_some(actor.id);
    let requests = storage.list_bigo_requests(query, creator_filter).await?;
    with_logins(storage, requests).await
}

/// 补充创建者与审核员的登录名
async fn with_logins(
    storage: &dyn Storage,
    requests: Vec<BigORequest>,
) -> Result<Vec<BigORequestResponse>> {
    let mut ids: Vec<i64> = requests
        .iter()
        .flat_map(|r| std::iter::once(r.creator_id).chain(r.moderator_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let logins = storage.get_user_logins(&ids).await?;

    Ok(requests
        .into_iter()
        .map(|r| {
            let creator_login = logins.get(&r.creator_id).cloned().unwrap_or_default();
            let moderator_login = r.moderator_id.and_then(|id| logins.get(&id).cloned());
            BigORequestResponse::new(r, creator_login, moderator_login)
        })
        .collect())
}

/// 提交草稿
pub async fn form(storage: &dyn Storage, actor: &User, id: i64) -> Result<BigORequest> {
    let request = load_accessible(storage, actor, id).await?;
    transition(storage, actor, request, BigORequestStatus::Formed).await
}

/// 删除草稿或已提交的请求
pub async fn delete(storage: &dyn Storage, actor: &User, id: i64) -> Result<BigORequest> {
    let request = load_accessible(storage, actor, id).await?;
    transition(storage, actor, request, BigORequestStatus::Deleted).await
}

/// 审核员完成或驳回已提交的请求
///
/// 完成时在本地计算总耗时与复杂度标签，并返回提交给外部计算服务的载荷。
pub async fn finish(
    storage: &dyn Storage,
    actor: &User,
    id: i64,
    target: BigORequestStatus,
) -> Result<FinishOutcome> {
    require_moderator(actor)?;

    if !matches!(
        target,
        BigORequestStatus::Finished | BigORequestStatus::Rejected
    ) {
        return Err(BigOError::validation(format!(
            "status must be finished or rejected, got {target}"
        )));
    }

    let request = load_request(storage, id).await?;
    if !request.status.can_transition_to(target) {
        return Err(transition_denied(&request, target));
    }

    let (result, payload) = if target == BigORequestStatus::Finished {
        let items = storage.list_request_items(id).await?;
        (
            Some(compute_result(&items)?),
            Some(CalculationPayload::new(id, &items)),
        )
    } else {
        (None, None)
    };

    let updated = storage
        .finish_bigo_request(id, target, actor.id, result)
        .await?
        .ok_or_else(|| transition_denied(&request, target))?;

    info!(
        "请求 {} 由审核员 {} 设为 {}，耗时 {}",
        updated.id, actor.id, updated.status, updated.calculated_time
    );

    Ok(FinishOutcome {
        request: updated,
        payload,
    })
}

/// 编辑请求（目前只有 calculated_time）
pub async fn edit(
    storage: &dyn Storage,
    actor: &User,
    id: i64,
    patch: UpdateBigORequestRequest,
) -> Result<BigORequest> {
    patch.validate()?;

    let request = storage
        .get_bigo_request_by_id(id)
        .await?
        .filter(|r| r.status != BigORequestStatus::Deleted)
        .ok_or_else(|| BigOError::not_found(format!("request {id} not found")))?;
    ensure_access(actor, &request)?;

    storage
        .update_bigo_request(id, patch)
        .await?
        .ok_or_else(|| BigOError::not_found(format!("request {id} not found")))
}

/// 外部计算服务回调
///
/// 只接受处于 `finished` 状态的请求；`success = false` 时请求被驳回。
pub async fn apply_calculation(
    storage: &dyn Storage,
    id: i64,
    callback: CalculationCallbackRequest,
    expected_key: &str,
) -> Result<BigORequest> {
    if expected_key.is_empty() || callback.auth_key != expected_key {
        return Err(BigOError::authentication("invalid calculation key"));
    }

    let request = storage
        .get_bigo_request_by_id(id)
        .await?
        .ok_or_else(|| BigOError::not_found(format!("request {id} not found")))?;

    if request.status != BigORequestStatus::Finished {
        return Err(BigOError::not_allowed(format!(
            "request {id} in status {} does not accept calculation results",
            request.status
        )));
    }

    if !callback.calculated_time.is_finite() || callback.calculated_time < 0.0 {
        return Err(BigOError::validation(
            "calculated_time must be a non-negative number",
        ));
    }

    let result = CalculationResult {
        calculated_time: callback.calculated_time,
        calculated_complexity: callback.calculated_complexity,
    };

    let updated = storage
        .apply_calculation_result(id, result, !callback.success)
        .await?
        .ok_or_else(|| BigOError::not_allowed(format!("request {id} is no longer finished")))?;

    info!(
        "请求 {} 收到计算结果，状态 {}，耗时 {}",
        updated.id, updated.status, updated.calculated_time
    );
    Ok(updated)
}
