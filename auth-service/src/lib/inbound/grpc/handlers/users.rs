use std::sync::Arc;

use tonic::Status;

use super::failure;
use super::STATUS_OK;
use crate::account::errors::AccountError;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountServicePort;
use crate::proto::GetUsersRequest;
use crate::proto::GetUsersResponse;

pub async fn get_users(
    service: Arc<dyn AccountServicePort>,
    request: GetUsersRequest,
) -> Result<GetUsersResponse, Status> {
    let result = match UserId::from_string(&request.user_id) {
        Ok(requester) => service.list_confirmed_users(&requester).await,
        Err(e) => Err(AccountError::from(e)),
    };

    match result {
        Ok(users) => Ok(GetUsersResponse {
            status: STATUS_OK,
            error: String::new(),
            users: users.into_iter().map(Into::into).collect(),
        }),
        Err(e) => {
            let (status, error) = failure("get_users", e);
            Ok(GetUsersResponse {
                status,
                error,
                users: Vec::new(),
            })
        }
    }
}
