use ideas_explorer::models::{IdeaStatus, TipoIdea, TipoPost, UpdateIdea};
use ideas_explorer::{IdeaApi, IdeasClient};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn idea_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "fecha": "2024-05-20",
        "nicho": "cooking",
        "body": "Fridge scanner that suggests recipes",
        "tipo_idea": "web_app",
        "tipo_post": "video",
        "guion": null,
        "idea": "Fridge chef",
        "status": 2,
        "web_app_prompt": null,
        "db_structure": null,
        "redes_sociales": ["Instagram"],
        "images_prompt": [],
        "created_at": "2024-05-20T10:00:00Z",
        "updated_at": "2024-05-21T10:00:00Z"
    })
}

#[tokio::test]
async fn list_maps_loose_payloads_to_canonical_ideas() {
    let server = MockServer::start().await;
    let loose = json!({
        "id": 9,
        "fecha": "2024-04-01T00:00:00.000Z",
        "nicho": "music",
        "body": "b",
        "tipo_idea": "mobile",
        "tipo_post": "imagen",
        "idea": "Loose",
        "status": "3",
        "redes_sociales": "Instagram|TikTok",
        "images_prompt": "[\"cover art\", \"\"]"
    });
    Mock::given(method("GET"))
        .and(path("/api/ideas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([idea_json(1), loose])))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdeasClient::new(server.uri());
    let ideas = client.list_ideas().await.unwrap();
    assert_eq!(ideas.len(), 2);

    assert_eq!(ideas[0].status, IdeaStatus::Progress);
    assert_eq!(ideas[0].tipo_idea, Some(TipoIdea::WebApp));

    let loose = &ideas[1];
    assert_eq!(loose.fecha.to_string(), "2024-04-01");
    assert_eq!(loose.tipo_idea, None);
    assert_eq!(loose.tipo_post, Some(TipoPost::Imagen));
    assert_eq!(loose.status, IdeaStatus::Posting);
    assert_eq!(loose.redes_sociales, ["Instagram", "TikTok"]);
    assert_eq!(loose.images_prompt, ["cover art"]);
}

#[tokio::test]
async fn status_change_sends_integer_code() {
    let server = MockServer::start().await;
    let mut updated = idea_json(5);
    updated["status"] = json!(4);
    Mock::given(method("PATCH"))
        .and(path("/api/ideas/5/status"))
        .and(body_json(json!({"status": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdeasClient::new(server.uri());
    let idea = client.update_status(5, IdeaStatus::Rejected).await.unwrap();
    assert_eq!(idea.id, 5);
    assert_eq!(idea.status, IdeaStatus::Rejected);
}

#[tokio::test]
async fn update_sends_only_present_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/ideas/1"))
        .and(body_json(json!({"nicho": "baking", "guion": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(idea_json(1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdeasClient::new(server.uri());
    let upd = UpdateIdea { nicho: Some("baking".into()), guion: Some(None), ..Default::default() };
    client.update_idea(1, &upd).await.unwrap();
}

#[tokio::test]
async fn errors_carry_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/ideas/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "idea not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ideas/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = IdeasClient::new(server.uri());
    let err = client.delete_idea(42).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "idea not found");

    let err = client.get_idea(1).await.unwrap_err();
    assert!(!err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 500");
}

#[tokio::test]
async fn delete_accepts_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/ideas/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdeasClient::new(format!("{}/", server.uri()));
    client.delete_idea(3).await.unwrap();
}
