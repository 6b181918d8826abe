use serde_json::json;
use teatro_manager::config::ClientOptions;
use teatro_manager::obras::{Obra, INVALID_DATE_MESSAGE, REQUIRED_FIELDS_MESSAGE};
use teatro_manager::ui::{FeedbackKind, ObrasScreen, Route, Tab};
use teatro_manager::TeatroManager;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_client(server: &MockServer, token: Option<&str>) -> TeatroManager {
    let options = ClientOptions::default()
        .with_api_url(&format!("{}/api/v1", server.uri()))
        .without_delays();
    let teatro = TeatroManager::new_with_options(options).unwrap();
    if let Some(token) = token {
        teatro.session().set_token(token).unwrap();
    }
    teatro
}

// nothing listens on port 1
fn offline_client() -> TeatroManager {
    let options = ClientOptions::default()
        .with_api_url("http://127.0.0.1:1/api/v1")
        .without_delays();
    let teatro = TeatroManager::new_with_options(options).unwrap();
    teatro.session().set_token("abc").unwrap();
    teatro
}

fn hamlet() -> Obra {
    serde_json::from_value(json!({
        "id": 7,
        "nome": "Hamlet",
        "diretor": "Ana Souza",
        "data": "2024-12-25",
        "local": "Teatro Municipal",
        "elenco": "João, Maria",
        "descricao": "Tragédia",
        "nota": 9
    }))
    .unwrap()
}

fn catalog() -> serde_json::Value {
    json!([
        {
            "id": 7,
            "nome": "Hamlet",
            "diretor": "Ana Souza",
            "data": "2024-12-25",
            "local": "Teatro Municipal",
            "elenco": "João, Maria",
            "descricao": "Tragédia",
            "nota": 9
        },
        {
            "id": 8,
            "nome": "Romeu e Julieta",
            "diretor": "Carlos Lima",
            "data": "2025-01-10",
            "local": "Teatro Principal",
            "elenco": "Elenco a definir",
            "nota": 6
        }
    ])
}

fn fill_draft(screen: &mut ObrasScreen, name: &str, date: &str) {
    screen.new_draft();
    let draft = screen.draft_mut();
    draft.name = name.to_string();
    draft.director = "Ana Souza".to_string();
    draft.date = date.to_string();
}

#[tokio::test]
async fn test_focus_without_token_redirects_to_auth() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, None);

    let mut screen = teatro.obras_screen();
    screen.on_focus().await;

    assert_eq!(screen.route(), Route::Auth);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_focus_loads_list_and_filters() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.on_focus().await;

    assert_eq!(screen.route(), Route::Obras);
    assert_eq!(screen.obras().len(), 2);
    assert!(screen.feedback().is_none());
    assert_eq!(screen.find(8).unwrap().name, "Romeu e Julieta");
    assert_eq!(screen.find(8).unwrap().description, None);

    screen.set_search("carlos");
    let filtered = screen.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, Some(8));

    screen.set_search("");
    assert_eq!(screen.filtered().len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_list_failure_shows_message() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.on_focus().await;

    let feedback = screen.feedback().unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert_eq!(feedback.message, "Falha ao carregar obras.");
    assert!(screen.obras().is_empty());
    assert!(teatro.session().has_valid_token());
}

#[tokio::test]
async fn test_create_with_empty_name_sends_nothing() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    let mut screen = teatro.obras_screen();
    fill_draft(&mut screen, "   ", "2024-12-25");
    assert!(screen.save().await.is_err());

    assert_eq!(screen.feedback().unwrap().message, REQUIRED_FIELDS_MESSAGE);
    assert_eq!(screen.tab(), Tab::Form);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_malformed_date_sends_nothing() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    let mut screen = teatro.obras_screen();
    fill_draft(&mut screen, "Hamlet", "12-2024-25");
    assert!(screen.save().await.is_err());

    assert_eq!(screen.feedback().unwrap().message, INVALID_DATE_MESSAGE);
    assert_eq!(screen.draft().date, "12-2024-25");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_normalizes_and_refreshes() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("POST"))
        .and(path("/api/v1/obras"))
        .and(header("Authorization", "Bearer abc"))
        .and(body_json(json!({
            "nome": "Hamlet",
            "diretor": "Ana Souza",
            "data": "2024-12-25",
            "descricao": "Sem descrição adicional",
            "local": "Teatro Principal",
            "elenco": "Elenco a definir",
            "nota": 10
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "nome": "Hamlet",
            "diretor": "Ana Souza",
            "data": "2024-12-25",
            "nota": 10
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    fill_draft(&mut screen, " Hamlet ", "25/12/2024");
    screen.draft_mut().rating = "15".to_string();
    let saved = screen.save().await.unwrap();

    assert_eq!(saved.and_then(|obra| obra.id), Some(7));

    let feedback = screen.feedback().unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Success);
    assert_eq!(feedback.message, "✓ Obra criada com sucesso!");
    assert_eq!(screen.tab(), Tab::List);
    assert_eq!(screen.draft().name, "");
    assert_eq!(screen.draft().rating, "5");
    assert_eq!(screen.obras().len(), 2);
    server.verify().await;
}

#[tokio::test]
async fn test_update_puts_to_record_path() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("PUT"))
        .and(path("/api/v1/obras/7"))
        .and(body_json(json!({
            "nome": "Hamlet",
            "diretor": "Ana Souza",
            "data": "2024-12-25",
            "descricao": "Tragédia",
            "local": "Teatro Municipal",
            "elenco": "João, Maria",
            "nota": 1
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.start_edit(&hamlet());
    assert_eq!(screen.tab(), Tab::Form);
    assert_eq!(screen.draft().rating, "9");

    screen.draft_mut().rating = "0".to_string();
    assert!(screen.save().await.unwrap().is_none());

    assert_eq!(screen.feedback().unwrap().message, "✓ Obra atualizada com sucesso!");
    assert!(screen.editing().is_none());
    server.verify().await;
}

#[tokio::test]
async fn test_save_maps_status_codes() {
    let cases: [(u16, &str); 7] = [
        (400, "Dados inválidos enviados para o servidor. Verifique os campos."),
        (403, "Você não tem permissão para executar esta ação."),
        (404, "Obra não encontrada."),
        (409, "Conflito: Esta obra pode já estar sendo editada."),
        (422, "Dados enviados são inválidos para o servidor."),
        (500, "Erro no servidor. Tente novamente mais tarde."),
        (502, "Erro 502: Não foi possível processar a requisição."),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        let teatro = setup_client(&server, Some("abc"));

        Mock::given(method("PUT"))
            .and(path("/api/v1/obras/7"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .mount(&server)
            .await;

        let mut screen = teatro.obras_screen();
        screen.start_edit(&hamlet());
        let err = screen.save().await.unwrap_err();

        assert_eq!(err.status(), Some(status));
        assert_eq!(screen.feedback().unwrap().message, expected, "status {}", status);
        assert_eq!(screen.tab(), Tab::Form);
        assert!(screen.editing().is_some());
        assert!(teatro.session().has_valid_token());
    }
}

#[tokio::test]
async fn test_delete_success_refreshes_once() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("DELETE"))
        .and(path("/api/v1/obras/7"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.request_delete(&hamlet());
    assert_eq!(screen.pending_delete().unwrap().id, Some(7));
    screen.confirm_delete().await;

    assert_eq!(screen.feedback().unwrap().message, "✓ Obra removida.");
    assert!(screen.pending_delete().is_none());
    server.verify().await;
}

#[tokio::test]
async fn test_delete_failure_does_not_refresh() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("DELETE"))
        .and(path("/api/v1/obras/7"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.delete(&hamlet()).await;

    assert_eq!(screen.feedback().unwrap().message, "Falha ao apagar obra.");
    server.verify().await;
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    let mut screen = teatro.obras_screen();
    screen.request_delete(&hamlet());
    screen.cancel_delete();
    screen.confirm_delete().await;

    assert!(screen.feedback().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_redirects() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("expired"));

    Mock::given(method("DELETE"))
        .and(path("/api/v1/obras/7"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.delete(&hamlet()).await;

    assert_eq!(
        screen.feedback().unwrap().message,
        "Sessão expirada. Faça login novamente."
    );
    assert_eq!(screen.route(), Route::Auth);
    assert!(!teatro.session().has_valid_token());

    // the next visit to the list goes straight back to login
    let mut next = teatro.obras_screen();
    next.on_focus().await;
    assert_eq!(next.route(), Route::Auth);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_unauthorized_on_save_waits_before_redirect() {
    let server = MockServer::start().await;
    let options = ClientOptions::default()
        .with_api_url(&format!("{}/api/v1", server.uri()))
        .without_delays()
        .with_redirect_delay(std::time::Duration::from_millis(50));
    let teatro = TeatroManager::new_with_options(options).unwrap();
    teatro.session().set_token("expired").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    fill_draft(&mut screen, "Hamlet", "2024-12-25");

    let started = std::time::Instant::now();
    assert!(screen.save().await.unwrap_err().is_unauthorized());

    assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    assert_eq!(screen.route(), Route::Auth);
    assert!(!teatro.session().has_valid_token());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    let mut screen = teatro.obras_screen();
    screen.logout();

    assert_eq!(screen.route(), Route::Auth);
    assert_eq!(teatro.session().get_clean_token(), "");
}

#[tokio::test]
async fn test_save_outcome_survives_failed_reload() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    Mock::given(method("POST"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "nome": "Hamlet" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    fill_draft(&mut screen, "Hamlet", "2024-12-25");
    let saved = screen.save().await.unwrap();

    assert_eq!(saved.and_then(|obra| obra.id), Some(9));
    // the banner reflects the reload, the return value the save
    assert_eq!(screen.feedback().unwrap().message, "Falha ao carregar obras.");
    assert_eq!(screen.tab(), Tab::List);
    server.verify().await;
}

#[tokio::test]
async fn test_unauthorized_list_clears_token_and_redirects() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("expired"));

    Mock::given(method("GET"))
        .and(path("/api/v1/obras"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = teatro.obras_screen();
    screen.on_focus().await;

    assert_eq!(
        screen.feedback().unwrap().message,
        "Sessão expirada. Faça login novamente."
    );
    assert_eq!(screen.route(), Route::Auth);
    assert!(screen.obras().is_empty());
    assert!(!teatro.session().has_valid_token());
    server.verify().await;
}

#[tokio::test]
async fn test_list_network_failure() {
    let teatro = offline_client();

    let mut screen = teatro.obras_screen();
    screen.on_focus().await;

    assert_eq!(
        screen.feedback().unwrap().message,
        "Erro de conexão ao buscar obras."
    );
    assert_eq!(screen.route(), Route::Obras);
    assert!(teatro.session().has_valid_token());
}

#[tokio::test]
async fn test_delete_network_failure() {
    let teatro = offline_client();

    let mut screen = teatro.obras_screen();
    screen.delete(&hamlet()).await;

    assert_eq!(screen.feedback().unwrap().message, "Erro de conexão.");
    assert!(screen.pending_delete().is_none());
    assert!(!screen.is_busy());
}

#[tokio::test]
async fn test_save_network_failure() {
    let teatro = offline_client();

    let mut screen = teatro.obras_screen();
    fill_draft(&mut screen, "Hamlet", "2024-12-25");
    let err = screen.save().await.unwrap_err();

    assert!(err.is_transport());
    let feedback = screen.feedback().unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert!(feedback.message.starts_with("Erro de conexão: "));
    assert_eq!(screen.tab(), Tab::Form);
    assert_eq!(screen.draft().name, "Hamlet");
}

#[tokio::test]
async fn test_record_without_id_is_not_sent() {
    let server = MockServer::start().await;
    let teatro = setup_client(&server, Some("abc"));

    let mut orphan = hamlet();
    orphan.id = None;

    let mut screen = teatro.obras_screen();
    screen.start_edit(&orphan);
    assert!(screen.save().await.is_err());
    assert_eq!(screen.feedback().unwrap().message, "Obra sem identificador.");

    screen.take_feedback();
    screen.delete(&orphan).await;
    assert_eq!(screen.feedback().unwrap().message, "Obra sem identificador.");

    assert!(server.received_requests().await.unwrap().is_empty());
}
