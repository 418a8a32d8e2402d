use super::*;

#[test]
fn methods_map_one_to_one() {
    assert_eq!(http_method(Method::Get), reqwest::Method::GET);
    assert_eq!(http_method(Method::Post), reqwest::Method::POST);
    assert_eq!(http_method(Method::Put), reqwest::Method::PUT);
    assert_eq!(http_method(Method::Delete), reqwest::Method::DELETE);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let request = ApiRequest {
        method: Method::Get,
        url: format!("http://{addr}/user/my-contributions"),
        authorization: Some("Bearer a.b.c".to_owned()),
        body: None,
    };
    let err = ReqwestTransport::default().send(request).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
