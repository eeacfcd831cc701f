use serde_json::json;

use crate::database::backend::{Backend, BackendResult};
use crate::models::{MyBoardPostsResponse, RpcOutcome};

pub const RPC_CREATE_BOARD_POST: &str = "rpc_create_board_post";
pub const RPC_GET_MY_BOARD_POSTS: &str = "rpc_get_my_board_posts";

pub struct NewBoardPost<'a> {
    pub name: &'a str,
    pub pin: &'a str,
    pub category: &'a str,
    pub title: &'a str,
    pub content: &'a str,
}

pub async fn create_board_post(
    backend: &dyn Backend,
    post: NewBoardPost<'_>,
) -> BackendResult<RpcOutcome> {
    let value = backend
        .rpc(
            RPC_CREATE_BOARD_POST,
            json!({
                "p_name": post.name,
                "p_pin": post.pin,
                "p_category": post.category,
                "p_title": post.title,
                "p_content": post.content,
            }),
        )
        .await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn list_my_board_posts(
    backend: &dyn Backend,
    name: &str,
    pin: &str,
) -> BackendResult<MyBoardPostsResponse> {
    let value = backend
        .rpc(RPC_GET_MY_BOARD_POSTS, json!({ "p_name": name, "p_pin": pin }))
        .await?;
    Ok(serde_json::from_value(value)?)
}
