use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json};

pub const SECURITY_SCHEME_BEARER: &str = "Bearer";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Postboard")
		.summary("Posts with owner-only editing")
		.description(
			"Anyone can read posts. Creating, editing and deleting posts requires \
			 a bearer token from `/sign-in`, and only the owner of a post may change it.",
		)
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("User accounts and bearer tokens".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: "Authorization".into(),
				description: Some("`Bearer <token>`, using the token returned by `/sign-in`".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				success: false,
				errors: error::Message::new("unknown_post")
					.content("The post you requested does not exist.")
					.detail("post", "4f1c2b8e-3d7a-4c55-9e0b-6a2f1d3c9b71")
					.into_vec(),
			})
		})
}
