use actix_web::{
    body::MessageBody,
    http::{header::ContentType, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
    HttpResponse,
};

/// Spin up a fresh service from `configure`, make one GET request and return the status and body.
pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let res = match test::try_call_service(&service, req).await {
        Ok(res) => res.into_parts().1,
        Err(e) => HttpResponse::from_error(e),
    };
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

/// Spin up a fresh service from `configure`, POST `body` as JSON and return the status and body.
/// Extractor failures (undeserializable or oversized payloads) are rendered to their error
/// responses, the same way a real client would see them.
pub async fn post_request(path: &str, body: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(ContentType::json())
        .set_payload(body.to_owned())
        .to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let res = match test::try_call_service(&service, req).await {
        Ok(res) => res.into_parts().1,
        Err(e) => HttpResponse::from_error(e),
    };
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
