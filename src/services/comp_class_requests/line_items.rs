//! 请求明细（购物车条目）操作

use tracing::info;

use crate::errors::{BigOError, Result};
use crate::models::bigo_requests::entities::{BigORequest, BigORequestStatus};
use crate::models::comp_class_requests::{
    entities::{CompClassRequest, DEFAULT_ARRAY_SIZE},
    requests::UpdateRequestItemRequest,
    responses::AddToRequestResponse,
};
use crate::models::users::entities::User;
use crate::services::bigo_requests::access::ensure_access;
use crate::storage::Storage;

/// 读取可修改明细的请求：必须存在、未删除、属于当前用户且处于草稿状态
async fn load_editable(storage: &dyn Storage, actor: &User, request_id: i64) -> Result<BigORequest> {
    let request = storage
        .get_bigo_request_by_id(request_id)
        .await?
        .filter(|r| r.status != BigORequestStatus::Deleted)
        .ok_or_else(|| BigOError::not_found(format!("request {request_id} not found")))?;

    ensure_access(actor, &request)?;

    if request.status != BigORequestStatus::Draft {
        return Err(BigOError::not_allowed(format!(
            "request {} is {}, only drafts can be edited",
            request.id, request.status
        )));
    }
    Ok(request)
}

/// 将复杂度类别加入当前用户的草稿，必要时创建草稿
///
/// 返回值中的布尔值表示草稿是否为本次新建。
pub async fn add_to_draft(
    storage: &dyn Storage,
    actor: &User,
    class_id: i64,
) -> Result<(AddToRequestResponse, bool)> {
    if storage.get_complex_class_by_id(class_id).await?.is_none() {
        return Err(BigOError::not_found(format!("complex class {class_id} not found")));
    }

    let draft = storage.get_or_create_draft_request(actor.id).await?;
    if draft.created {
        info!("为用户 {} 创建草稿 {}", actor.id, draft.request.id);
    }

    storage
        .add_request_item(draft.request.id, class_id, DEFAULT_ARRAY_SIZE)
        .await?;
    let compclass_count = storage.count_request_items(draft.request.id).await?;

    Ok((
        AddToRequestResponse {
            request: draft.request,
            compclass_count,
        },
        draft.created,
    ))
}

/// 当前用户草稿中的明细数量，没有草稿时为 0
pub async fn count(storage: &dyn Storage, owner: &User) -> Result<i64> {
    match storage.find_draft_request(owner.id).await? {
        Some(draft) => storage.count_request_items(draft.id).await,
        None => Ok(0),
    }
}

/// 向指定草稿添加明细
pub async fn add(
    storage: &dyn Storage,
    actor: &User,
    request_id: i64,
    class_id: i64,
) -> Result<CompClassRequest> {
    let request = load_editable(storage, actor, request_id).await?;
    if storage.get_complex_class_by_id(class_id).await?.is_none() {
        return Err(BigOError::not_found(format!("complex class {class_id} not found")));
    }
    storage
        .add_request_item(request.id, class_id, DEFAULT_ARRAY_SIZE)
        .await
}

/// 修改明细的数组规模
pub async fn edit(
    storage: &dyn Storage,
    actor: &User,
    request_id: i64,
    class_id: i64,
    patch: UpdateRequestItemRequest,
) -> Result<CompClassRequest> {
    patch.validate()?;
    let request = load_editable(storage, actor, request_id).await?;
    storage
        .update_request_item(request.id, class_id, patch.array_size)
        .await?
        .ok_or_else(|| {
            BigOError::not_found(format!(
                "complex class {class_id} is not in request {request_id}"
            ))
        })
}

/// 从草稿中移除明细
pub async fn remove(
    storage: &dyn Storage,
    actor: &User,
    request_id: i64,
    class_id: i64,
) -> Result<()> {
    let request = load_editable(storage, actor, request_id).await?;
    if !storage.remove_request_item(request.id, class_id).await? {
        return Err(BigOError::not_found(format!(
            "complex class {class_id} is not in request {request_id}"
        )));
    }
    Ok(())
}
