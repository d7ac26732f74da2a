use std::rc::Rc;

use formwork::{
    Association, AssociationKind, AttributeKind, AttributeType, Bindable, Choices, Form,
    FormError, ModelName, Params, Value,
};

#[derive(Debug)]
struct Address {
    street: &'static str,
    city: &'static str,
}

impl Bindable for Address {
    fn read_attribute(&self, key: &str) -> Option<Value> {
        match key {
            "street" => Some(self.street.into()),
            "city" => Some(self.city.into()),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Team {
    id: i64,
    name: &'static str,
}

impl Bindable for Team {
    fn read_attribute(&self, key: &str) -> Option<Value> {
        match key {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.into()),
            _ => None,
        }
    }

    fn to_param(&self) -> Option<String> {
        Some(self.id.to_string())
    }

    fn to_label(&self) -> Option<String> {
        Some(self.name.to_string())
    }
}

#[derive(Debug)]
struct User {
    team: Rc<dyn Bindable>,
    teams: Vec<Value>,
    addresses: Vec<Value>,
}

impl User {
    fn new() -> Self {
        let teams: Vec<Rc<dyn Bindable>> = vec![
            Rc::new(Team { id: 1, name: "Core" }),
            Rc::new(Team { id: 2, name: "Web" }),
        ];
        Self {
            team: Rc::clone(&teams[1]),
            teams: teams.into_iter().map(Value::Object).collect(),
            addresses: vec![
                Value::Object(Rc::new(Address {
                    street: "Main St",
                    city: "Oslo",
                })),
                Value::Object(Rc::new(Address {
                    street: "Wall St",
                    city: "Bergen",
                })),
            ],
        }
    }
}

impl Bindable for User {
    fn read_attribute(&self, key: &str) -> Option<Value> {
        match key {
            "name" => Some("Ann".into()),
            "admin" => Some(true.into()),
            "roles" => Some(Value::Array(vec!["editor".into(), "viewer".into()])),
            "team" => Some(Value::Object(Rc::clone(&self.team))),
            "addresses" => Some(Value::Array(self.addresses.clone())),
            "bio" => Some(Value::Null),
            _ => None,
        }
    }

    fn attribute_type(&self, key: &str) -> Option<AttributeType> {
        match key {
            "admin" => Some(AttributeType::new(AttributeKind::Boolean)),
            "roles" => Some(AttributeType::new(AttributeKind::String).array()),
            "bio" => Some(AttributeType::new(AttributeKind::Text)),
            _ => None,
        }
    }

    fn association(&self, key: &str) -> Option<Association> {
        (key == "team").then(|| {
            Association::new(AssociationKind::BelongsTo, "team", "Team")
                .with_candidates(Choices::Values(self.teams.clone()))
        })
    }

    fn model_name(&self) -> Option<ModelName> {
        Some(ModelName {
            param_key: "user".into(),
            human: "User".into(),
        })
    }

    fn is_persisted(&self) -> Option<bool> {
        Some(true)
    }
}

fn address_fields(address: &mut formwork::Namespace) -> Result<(), FormError> {
    address.field("street")?.input_tag()?;
    address.field("city")?.input_tag()?;
    Ok(())
}

fn user_form() -> Form {
    let mut form = Form::for_object(Rc::new(User::new())).unwrap();
    form.field("name").unwrap().input_tag().unwrap();
    form.field("admin").unwrap().auto_input().unwrap();
    form.field("bio").unwrap().auto_input().unwrap();
    form.field("roles")
        .unwrap()
        .set_choices(vec!["admin", "editor", "viewer"])
        .select_tag()
        .unwrap();
    form.field("team").unwrap().auto_input().unwrap();
    form.nest_many("addresses", address_fields).unwrap();
    form
}

fn submitted(form: &Form) -> Params {
    Params::from_pairs(form.submission_pairs()).unwrap()
}

#[test]
fn test_unchanged_values_round_trip() {
    let form = user_form();
    let extracted = form.extract_input(&submitted(&form)).unwrap();
    let expected = formwork_params::parse_query(
        "user[name]=Ann\
         &user[admin]=1\
         &user[roles][]=editor&user[roles][]=viewer\
         &user[team_id]=2\
         &user[addresses][][street]=Main+St&user[addresses][][city]=Oslo\
         &user[addresses][][street]=Wall+St&user[addresses][][city]=Bergen",
    )
    .unwrap();
    let Params::Map(mut expected) = expected else {
        panic!("expected a map");
    };
    expected
        .get_mut("user")
        .and_then(|user| match user {
            Params::Map(user) => Some(user),
            _ => None,
        })
        .unwrap()
        .insert("bio", Params::Null);
    let user = extracted.get("user").and_then(Params::as_map).unwrap();
    let expected_user = expected.get("user").and_then(Params::as_map).unwrap();
    for key in expected_user.keys() {
        assert_eq!(user.get(key), expected_user.get(key), "mismatch for {key}");
    }
    assert_eq!(user.len(), expected_user.len());
}

#[test]
fn test_submission_names() {
    let form = user_form();
    let names: Vec<String> = form
        .submission_pairs()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert!(names.contains(&"user[roles][]".to_string()));
    assert!(names.contains(&"user[team]".to_string()));
    assert!(names.contains(&"user[addresses][1][city]".to_string()));
}

#[test]
fn test_inferred_components() {
    let mut form = user_form();
    let admin = form.field("admin").unwrap();
    assert_eq!(admin.input().unwrap().kind, formwork::InputKind::Checkbox);
    let bio = form.field("bio").unwrap();
    assert_eq!(bio.input().unwrap().kind, formwork::InputKind::Textarea);
    let team = form.field("team").unwrap();
    let team_input = team.input().unwrap();
    assert_eq!(team_input.kind, formwork::InputKind::BelongsTo);
    assert_eq!(team_input.input_param, "team_id");
    let choices = team_input.choices.as_ref().unwrap();
    assert_eq!(choices.values(), vec!["1", "2"]);
    assert_eq!(choices.get("2"), Some("Web"));
    assert_eq!(team.value(), &Value::from("2"));
}

#[test]
fn test_unchecked_checkbox_and_cleared_selection() {
    let form = user_form();
    let params = formwork_params::parse_query(
        "user[name]=Ann&user[admin]=0&user[roles][]=&user[team]=99&user[addresses][0][street]=X",
    )
    .unwrap();
    let extracted = form.extract_input(&params).unwrap();
    let user = extracted.get("user").and_then(Params::as_map).unwrap();
    assert_eq!(user.get("admin"), Some(&Params::text("0")));
    assert_eq!(user.get("roles"), Some(&Params::Array(vec![])));
    assert_eq!(user.get("team_id"), Some(&Params::Null));
    let addresses = user.get("addresses").and_then(Params::as_array).unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].get("street"), Some(&Params::text("X")));
    assert_eq!(addresses[0].get("city"), Some(&Params::Null));
}

#[test]
fn test_form_metadata() {
    let form = user_form();
    assert_eq!(form.method(), formwork::Method::Patch);
    assert_eq!(form.submit_label(), "Update User");
    assert!(!form.has_file_input());
}
