use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use catalog::{
    payloads::{PerkView, SessionVotes, UserView, VoteResponse},
    perks::{MembershipType, Perk, User},
    votes::VoteState,
};
use http_body_util::BodyExt;
use perks::{app, config::Config, state::State};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower::ServiceExt;

struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    fn new(state: Arc<State>) -> Self {
        Self {
            router: app(state),
            cookie: None,
        }
    }

    /// Same server, fresh browser.
    fn other_session(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    async fn send(&mut self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = match pair.split_once('=') {
                Some((_, "")) | None => None,
                Some(_) => Some(pair.to_string()),
            };
        }

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, bytes.to_vec())
    }

    async fn json<T: DeserializeOwned>(
        &mut self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> T {
        let (status, bytes) = self.send(method, uri, body).await;
        assert_eq!(status, expected, "{}", String::from_utf8_lossy(&bytes));

        serde_json::from_slice(&bytes).unwrap()
    }

    async fn vote(&mut self, perk: u64, direction: &str) -> VoteResponse {
        self.json(
            "POST",
            &format!("/api/perks/{perk}/{direction}"),
            None,
            StatusCode::OK,
        )
        .await
    }
}

async fn seeded() -> (Client, Perk) {
    let state = State::in_memory(Config::default());
    let mut client = Client::new(state);

    let caa: MembershipType = client
        .json(
            "POST",
            "/api/memberships",
            Some(json!({ "name": "CAA" })),
            StatusCode::CREATED,
        )
        .await;
    client
        .json::<MembershipType>(
            "POST",
            "/api/memberships",
            Some(json!({ "name": "Costco" })),
            StatusCode::CREATED,
        )
        .await;
    let user: User = client
        .json(
            "POST",
            "/api/users/register",
            Some(json!({ "username": "jane" })),
            StatusCode::CREATED,
        )
        .await;

    let perk: Perk = client
        .json(
            "POST",
            "/api/perks",
            Some(json!({
                "title": "Gas discount",
                "description": "5 cents off per litre",
                "region": "Ontario",
                "membershipType": caa.name,
                "userId": user.id,
                "expiryDate": "2030-06-01",
            })),
            StatusCode::CREATED,
        )
        .await;

    (client, perk)
}

#[tokio::test]
async fn test_health() {
    let mut client = Client::new(State::in_memory(Config::default()));

    let (status, body) = client.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_two_sessions_voting() {
    let (mut a, perk) = seeded().await;
    let mut b = a.other_session();

    let outcome = a.vote(perk.id, "upvote").await;
    assert_eq!((outcome.votes, outcome.state), (1, VoteState::Upvoted));

    let outcome = b.vote(perk.id, "downvote").await;
    assert_eq!((outcome.votes, outcome.state), (0, VoteState::Downvoted));

    let outcome = a.vote(perk.id, "upvote").await;
    assert_eq!((outcome.votes, outcome.state), (-1, VoteState::NoVote));

    let outcome = b.vote(perk.id, "upvote").await;
    assert_eq!((outcome.votes, outcome.state), (1, VoteState::Upvoted));

    let view: PerkView = a
        .json("GET", &format!("/api/perks/{}", perk.id), None, StatusCode::OK)
        .await;
    assert_eq!((view.votes, view.my_vote), (1, VoteState::NoVote));

    let view: PerkView = b
        .json("GET", &format!("/api/perks/{}", perk.id), None, StatusCode::OK)
        .await;
    assert_eq!((view.votes, view.my_vote), (1, VoteState::Upvoted));
}

#[tokio::test]
async fn test_vote_with_query_flag() {
    let (mut client, perk) = seeded().await;

    let outcome: VoteResponse = client
        .json(
            "POST",
            &format!("/api/perks/{}/vote?upvote=false", perk.id),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!((outcome.votes, outcome.state), (-1, VoteState::Downvoted));

    let outcome: VoteResponse = client
        .json(
            "POST",
            &format!("/api/perks/{}/vote?upvote=true", perk.id),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!((outcome.votes, outcome.state), (1, VoteState::Upvoted));
}

#[tokio::test]
async fn test_vote_on_unknown_perk() {
    let (mut client, _) = seeded().await;

    let (status, body) = client.send("POST", "/api/perks/999/upvote", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let session: SessionVotes = client
        .json("GET", "/api/session/votes", None, StatusCode::OK)
        .await;
    assert!(session.votes.is_empty());
}

#[tokio::test]
async fn test_unknown_perk_is_not_found() {
    let (mut client, _) = seeded().await;

    let (status, _) = client.send("GET", "/api/perks/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_perk_validation() {
    let (mut client, _) = seeded().await;

    let (status, _) = client
        .send(
            "POST",
            "/api/perks",
            Some(json!({
                "title": "   ",
                "description": "x",
                "region": "x",
                "membershipType": "CAA",
                "userId": 1,
                "expiryDate": "2030-06-01",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .send(
            "POST",
            "/api/perks",
            Some(json!({
                "title": "Cashback",
                "description": "x",
                "region": "x",
                "membershipType": "Amex",
                "userId": 1,
                "expiryDate": "2030-06-01",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_filters_and_sorts() {
    let (mut client, gas) = seeded().await;

    let bulk: Perk = client
        .json(
            "POST",
            "/api/perks",
            Some(json!({
                "title": "Bulk snacks",
                "description": "Two for one on snacks",
                "region": "Canada",
                "membershipType": "costco",
                "userId": 1,
                "expiryDate": "2026-12-31",
            })),
            StatusCode::CREATED,
        )
        .await;
    client.vote(bulk.id, "upvote").await;

    let results: Vec<PerkView> = client
        .json("GET", "/api/perks", None, StatusCode::OK)
        .await;
    let ids: Vec<u64> = results.iter().map(|view| view.perk.id).collect();
    assert_eq!(ids, vec![bulk.id, gas.id]);
    assert_eq!(results[0].my_vote, VoteState::Upvoted);

    let results: Vec<PerkView> = client
        .json("GET", "/api/perks?membershipType=CAA", None, StatusCode::OK)
        .await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].perk.id, gas.id);

    let results: Vec<PerkView> = client
        .json("GET", "/api/perks?keyword=SNACKS", None, StatusCode::OK)
        .await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].perk.id, bulk.id);

    let results: Vec<PerkView> = client
        .json("GET", "/api/perks?sortBy=expiry", None, StatusCode::OK)
        .await;
    let ids: Vec<u64> = results.iter().map(|view| view.perk.id).collect();
    assert_eq!(ids, vec![bulk.id, gas.id]);
}

#[tokio::test]
async fn test_delete_perk() {
    let (mut client, perk) = seeded().await;

    let body: Value = client
        .json("DELETE", &format!("/api/perks/{}", perk.id), None, StatusCode::OK)
        .await;
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = client
        .send("POST", &format!("/api/perks/{}/upvote", perk.id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_register_conflict() {
    let (mut client, _) = seeded().await;

    let (status, _) = client
        .send(
            "POST",
            "/api/users/register",
            Some(json!({ "username": "jane" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = client
        .send(
            "POST",
            "/api/users/register",
            Some(json!({ "username": "no spaces" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_memberships() {
    let (mut client, perk) = seeded().await;
    let user = perk.created_by.id;
    let caa = perk.membership_type.id;

    let assigned: MembershipType = client
        .json(
            "POST",
            &format!("/api/users/{user}/memberships"),
            Some(json!({ "membershipTypeId": caa })),
            StatusCode::CREATED,
        )
        .await;
    assert_eq!(assigned.name, "CAA");

    let view: UserView = client
        .json("GET", &format!("/api/users/{user}"), None, StatusCode::OK)
        .await;
    assert_eq!(view.username, "jane");
    assert_eq!(view.memberships, vec![assigned.clone()]);

    let available: Vec<MembershipType> = client
        .json(
            "GET",
            &format!("/api/users/{user}/memberships/available"),
            None,
            StatusCode::OK,
        )
        .await;
    let names: Vec<&str> = available.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Costco"]);

    client
        .json::<Value>(
            "DELETE",
            &format!("/api/users/{user}/memberships/{caa}"),
            None,
            StatusCode::OK,
        )
        .await;

    let view: UserView = client
        .json("GET", &format!("/api/users/{user}"), None, StatusCode::OK)
        .await;
    assert!(view.memberships.is_empty());

    let (status, _) = client.send("GET", "/api/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_session_forgets_votes() {
    let (mut client, perk) = seeded().await;

    client.vote(perk.id, "upvote").await;

    let session: SessionVotes = client
        .json("GET", "/api/session/votes", None, StatusCode::OK)
        .await;
    assert_eq!(session.votes.get(&perk.id), Some(&VoteState::Upvoted));

    let (status, _) = client.send("POST", "/api/session/end", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(client.cookie.is_none());

    // A new session can vote again; the score keeps the earlier vote.
    let outcome = client.vote(perk.id, "upvote").await;
    assert_eq!((outcome.votes, outcome.state), (2, VoteState::Upvoted));
}
