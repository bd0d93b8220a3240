//! OpenAPI description of a [`CrudRouter`].
//!
//! Record bodies are schemaless documents, so records, create bodies and
//! update bodies are published as named open objects. Several routers can be
//! combined with [`OpenApi::merge`].

use utoipa::IntoParams;
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, HttpMethod, Info, ObjectBuilder, OpenApi, OpenApiBuilder,
    PathItem, PathsBuilder, Ref, RefOr, Required, Response, ResponseBuilder, Schema, Type,
    path::{OperationBuilder, ParameterBuilder, ParameterIn},
    request_body::RequestBodyBuilder,
    schema::Array,
    tag::Tag,
};

use crate::core::CRUDResource;
use crate::pagination::Pagination;
use crate::router::{CrudRouter, Operation};

const JSON: &str = "application/json";

/// Names of the component schemas published for `T`.
struct SchemaNames {
    record: String,
    create: String,
    update: String,
}

impl SchemaNames {
    fn of<T: CRUDResource>() -> Self {
        let record = pascal(T::RESOURCE_NAME_SINGULAR);
        Self {
            create: format!("{record}Create"),
            update: format!("{record}Update"),
            record,
        }
    }
}

fn pascal(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Operation id as exposed in the generated document.
#[must_use]
pub fn operation_id<T: CRUDResource>(operation: Operation) -> String {
    let singular = T::RESOURCE_NAME_SINGULAR;
    let plural = T::RESOURCE_NAME_PLURAL;
    match operation {
        Operation::GetAll => format!("get_all_{plural}"),
        Operation::GetOne => format!("get_one_{singular}"),
        Operation::Create => format!("create_one_{singular}"),
        Operation::Update => format!("update_one_{singular}"),
        Operation::DeleteOne => format!("delete_one_{singular}"),
        Operation::DeleteAll => format!("delete_all_{plural}"),
    }
}

fn summary<T: CRUDResource>(operation: Operation) -> String {
    let singular = T::RESOURCE_NAME_SINGULAR;
    let plural = T::RESOURCE_NAME_PLURAL;
    match operation {
        Operation::GetAll => format!("Get all {plural}"),
        Operation::GetOne => format!("Get one {singular}"),
        Operation::Create => format!("Create one {singular}"),
        Operation::Update => format!("Update one {singular}"),
        Operation::DeleteOne => format!("Delete one {singular}"),
        Operation::DeleteAll => format!("Delete all {plural}"),
    }
}

fn open_object(description: &str) -> Schema {
    Schema::Object(
        ObjectBuilder::new()
            .schema_type(Type::Object)
            .description(Some(description))
            .build(),
    )
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content(JSON, ContentBuilder::new().schema(Some(schema)).build())
        .build()
}

fn error_response(description: &str) -> Response {
    json_response(
        description,
        RefOr::T(open_object("Error body with an `error` message")),
    )
}

fn item_id_parameter() -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name("item_id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some("Record identifier"))
        .schema(Some(RefOr::T(Schema::Object(
            ObjectBuilder::new().schema_type(Type::String).build(),
        ))))
        .build()
}

fn describe<T: CRUDResource>(
    router: &CrudRouter<T>,
    operation: Operation,
    names: &SchemaNames,
) -> utoipa::openapi::path::Operation {
    let record: RefOr<Schema> = Ref::from_schema_name(&names.record).into();
    let records = RefOr::T(Schema::Array(Array::new(record.clone())));

    let mut builder = OperationBuilder::new()
        .operation_id(Some(operation_id::<T>(operation)))
        .summary(Some(summary::<T>(operation)))
        .tags(Some(router.tag_names().to_vec()));
    if !T::RESOURCE_DESCRIPTION.is_empty() {
        builder = builder.description(Some(T::RESOURCE_DESCRIPTION));
    }

    if operation == Operation::GetAll {
        for parameter in Pagination::into_params(|| Some(ParameterIn::Query)) {
            builder = builder.parameter(parameter);
        }
    }
    if operation.is_item_route() {
        builder = builder
            .parameter(item_id_parameter())
            .response("400", error_response("Malformed identifier"))
            .response("404", error_response("Record not found"));
    }

    builder = match operation {
        Operation::GetAll => builder
            .response("200", json_response("One page of records", records))
            .response("422", error_response("Invalid skip or limit")),
        Operation::GetOne => builder.response("200", json_response("The record", record)),
        Operation::Create => builder
            .request_body(Some(
                RequestBodyBuilder::new()
                    .content(
                        JSON,
                        ContentBuilder::new()
                            .schema(Some(Ref::from_schema_name(&names.create)))
                            .build(),
                    )
                    .required(Some(Required::True))
                    .build(),
            ))
            .response("201", json_response("The created record", record))
            .response("409", error_response("Duplicate record")),
        Operation::Update => builder
            .request_body(Some(
                RequestBodyBuilder::new()
                    .content(
                        JSON,
                        ContentBuilder::new()
                            .schema(Some(Ref::from_schema_name(&names.update)))
                            .build(),
                    )
                    .required(Some(Required::True))
                    .build(),
            ))
            .response("200", json_response("The updated record", record)),
        Operation::DeleteOne => {
            builder.response("200", json_response("The removed record", record))
        }
        Operation::DeleteAll => {
            builder.response("200", json_response("Every removed record", records))
        }
    };

    builder
        .response("500", error_response("Store failure"))
        .build()
}

/// Build the OpenAPI document for the enabled routes of `router`.
pub(crate) fn document<T: CRUDResource>(router: &CrudRouter<T>) -> OpenApi {
    let names = SchemaNames::of::<T>();

    let mut collection_item: Option<PathItem> = None;
    let mut single_item: Option<PathItem> = None;
    for operation in router.enabled_operations() {
        let slot = if operation.is_item_route() {
            &mut single_item
        } else {
            &mut collection_item
        };
        let described = describe(router, operation, &names);
        match slot {
            Some(item) => set_operation(item, operation, described),
            None => *slot = Some(PathItem::new(http_method(operation), described)),
        }
    }

    let mut paths = PathsBuilder::new();
    if let Some(item) = collection_item {
        paths = paths.path(router.collection_path(), item);
    }
    if let Some(item) = single_item {
        paths = paths.path(router.item_path(), item);
    }

    let description = if T::RESOURCE_DESCRIPTION.is_empty() {
        format!("A {} record", T::RESOURCE_NAME_SINGULAR)
    } else {
        T::RESOURCE_DESCRIPTION.to_string()
    };
    let components = ComponentsBuilder::new()
        .schema(names.record.clone(), open_object(&description))
        .schema(
            names.create.clone(),
            open_object("Fields of a new record; identifiers are assigned by the store"),
        )
        .schema(
            names.update.clone(),
            open_object("Fields to change; omitted fields are left untouched"),
        )
        .build();

    OpenApiBuilder::new()
        .info(Info::new(
            T::RESOURCE_NAME_PLURAL,
            env!("CARGO_PKG_VERSION"),
        ))
        .paths(paths.build())
        .components(Some(components))
        .tags(Some(router.tag_names().iter().map(Tag::new)))
        .build()
}

fn http_method(operation: Operation) -> HttpMethod {
    match operation {
        Operation::GetAll | Operation::GetOne => HttpMethod::Get,
        Operation::Create => HttpMethod::Post,
        Operation::Update => HttpMethod::Put,
        Operation::DeleteOne | Operation::DeleteAll => HttpMethod::Delete,
    }
}

fn set_operation(
    item: &mut PathItem,
    operation: Operation,
    described: utoipa::openapi::path::Operation,
) {
    let slot = match operation {
        Operation::GetAll | Operation::GetOne => &mut item.get,
        Operation::Create => &mut item.post,
        Operation::Update => &mut item.put,
        Operation::DeleteOne | Operation::DeleteAll => &mut item.delete,
    };
    *slot = Some(described);
}
