use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};

use markov_gen_core::model::markov_model::MarkovModel;
use serde::Deserialize;

/// Window length used for the model the server starts with.
const DEFAULT_WINDOW_LENGTH: usize = 2;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	initial: String,
	length: usize,
}

/// Struct representing query parameters for the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainParams {
	path: String,
}

/// Struct representing query parameters for the `/v1/reset` endpoint
#[derive(Deserialize)]
struct ResetParams {
	window_length: usize,
	seed: Option<u64>,
}

struct SharedData {
	model: MarkovModel,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Extends the given initial text up to the requested length using the
/// shared model. Returns the generated text as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().body(shared_data.model.generate(&query.initial, query.length))
}

/// HTTP PUT endpoint `/v1/train`
///
/// Trains the shared model from a corpus file on the server's disk.
#[put("/v1/train")]
async fn put_train_file(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.model.train_from_path(&query.path) {
		Ok(()) => HttpResponse::Ok().body(format!("{} windows", shared_data.model.context_count())),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP POST endpoint `/v1/train`
///
/// Trains the shared model from the raw text lines of the request body.
#[post("/v1/train")]
async fn post_train_lines(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	shared_data.model.train(body.lines());
	HttpResponse::Ok().body(format!("{} windows", shared_data.model.context_count()))
}

/// HTTP GET endpoint `/v1/model`
///
/// Returns the diagnostic dump of the shared model's window map.
#[get("/v1/model")]
async fn get_model_dump(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().body(shared_data.model.to_string())
}

/// HTTP PUT endpoint `/v1/reset`
///
/// Replaces the shared model with an untrained one, optionally seeded
/// for reproducible generation.
#[put("/v1/reset")]
async fn put_reset(data: web::Data<Mutex<SharedData>>, query: web::Query<ResetParams>) -> impl Responder {
	let model = match query.seed {
		Some(seed) => MarkovModel::with_seed(query.window_length, seed),
		None => MarkovModel::new(query.window_length),
	};
	let model = match model {
		Ok(m) => m,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	shared_data.model = model;
	HttpResponse::Ok().body("Model reset")
}

/// Main entry point for the server.
///
/// Creates an untrained model, wraps it in a `Mutex` for thread safety,
/// and starts an Actix-web HTTP server exposing training, generation,
/// dump and reset endpoints.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The model starts empty; train it through `/v1/train`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		// Impossible to panic, the default window length is >= 1
		model: MarkovModel::new(DEFAULT_WINDOW_LENGTH).unwrap(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_model_dump)
			.service(put_train_file)
			.service(post_train_lines)
			.service(put_reset)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
