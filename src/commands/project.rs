//! 部屋・設備の登録（Add another room / Submit）

use super::{print_notice, print_route, unwrap_data, Context};
use crate::cli::{split_assignment, split_image_arg, RoomArgs};
use crate::client::ApiClient;
use crate::error::{DazlError, Result};
use crate::project::{upload_all, LocalImage, ProjectDispatcher, RoomState};
use dazl_common::api::{Endpoint, RoomType};
use dazl_common::feature_list::{FeatureList, FeatureOption, SlotId};
use dazl_common::payload::{ProjectKind, SubmissionBuilder, SubmitAction};
use dazl_common::storage::UserType;
use dazl_common::upload::{UploadOutcome, UploadSlots};
use dazl_common::validation::ValidationErrors;
use dazl_common::wizard::{Wizard, WizardEvent};
use std::collections::HashMap;
use tracing::info;

async fn fetch_features(client: &ApiClient, room_id: &str) -> Result<FeatureList> {
    let value = client
        .get_json(&Endpoint::RoomFeatures(room_id.to_string()))
        .await?;
    let options: Vec<FeatureOption> = serde_json::from_value(unwrap_data(value))?;
    Ok(FeatureList::from_options(&options))
}

async fn room_name(client: &ApiClient, room_id: &str) -> Result<Option<String>> {
    let value = client.get_json(&Endpoint::RoomTypes).await?;
    let rooms: Vec<RoomType> = serde_json::from_value(unwrap_data(value))?;
    Ok(rooms
        .into_iter()
        .find(|r| r.id.to_string() == room_id)
        .map(|r| r.name))
}

pub async fn features(ctx: &Context, room_id: &str) -> Result<()> {
    ctx.require_login()?;
    let list = fetch_features(&ctx.client()?, room_id).await?;
    println!("設備一覧 (部屋 {}):", room_id);
    for feature in list.features() {
        println!("  {:>4}  {}", feature.feature_id, feature.display_name());
    }
    Ok(())
}

fn input_error(field: &str, message: String) -> DazlError {
    let mut errors = ValidationErrors::default();
    errors.insert(field, message);
    DazlError::Validation(errors)
}

/// `--check` / `--note` / `--image` を設備リストに反映し、アップロード対象を返す
pub fn apply_room_args(
    list: &mut FeatureList,
    wizard: &mut Wizard,
    args: &RoomArgs,
) -> Result<Vec<(SlotId, LocalImage)>> {
    for feature_id in &args.checks {
        let key = list
            .find_by_feature_id(*feature_id)
            .map(|f| f.key)
            .ok_or_else(|| input_error("check", format!("Unknown feature {}", feature_id)))?;
        list.set_checked(key, true);
        wizard
            .apply(WizardEvent::FeatureToggled {
                any_checked: list.any_checked(),
            })
            .map_err(dazl_common::Error::from)?;
    }

    for note in &args.notes {
        let (feature_id, text) = split_assignment(note).map_err(|e| input_error("note", e))?;
        let key = list
            .find_by_feature_id(feature_id)
            .map(|f| f.key)
            .ok_or_else(|| input_error("note", format!("Unknown feature {}", feature_id)))?;
        list.set_note(key, text);
    }

    let mut used: HashMap<u64, usize> = HashMap::new();
    let mut jobs = Vec::new();
    for arg in &args.images {
        let (feature_id, rest) = split_assignment(arg).map_err(|e| input_error("image", e))?;
        let feature = list
            .find_by_feature_id(feature_id)
            .ok_or_else(|| input_error("image", format!("Unknown feature {}", feature_id)))?;
        let key = feature.key;
        let first_slot = feature.slots[0].id;

        let count = used.entry(feature_id).or_insert(0);
        let slot = if *count == 0 {
            first_slot
        } else {
            list.append_slot(key)
                .ok_or_else(|| input_error("image", format!("Unknown feature {}", feature_id)))?
        };
        *count += 1;

        let (path, description) = split_image_arg(&rest);
        list.set_slot_description(slot, description);
        jobs.push((slot, LocalImage::from_path(&path)?));
    }
    Ok(jobs)
}

pub async fn capture_room(ctx: &mut Context, args: RoomArgs, action: SubmitAction) -> Result<()> {
    ctx.require_login()?;
    let client = ctx.client()?;

    let kind: ProjectKind = match args.kind {
        Some(kind) => kind.into(),
        None => match ctx.session.user_type() {
            Some(UserType::Agent) => ProjectKind::Realtor,
            _ => ProjectKind::HomeOwner,
        },
    };
    let name = match &args.name {
        Some(name) => name.clone(),
        None => room_name(&client, &args.room)
            .await?
            .unwrap_or_else(|| format!("Room {}", args.room)),
    };
    ctx.session.select_room(&args.room, &name)?;

    let mut list = fetch_features(&client, &args.room).await?;
    let mut wizard = Wizard::rooms_only();
    wizard.apply(WizardEvent::RoomSelected).map_err(dazl_common::Error::from)?;
    let jobs = apply_room_args(&mut list, &mut wizard, &args)?;

    let mut uploads = UploadSlots::new();
    if !jobs.is_empty() {
        println!("- 画像をアップロード中... ({}枚)", jobs.len());
        let outcomes = upload_all(&client, &mut uploads, &mut list, &jobs).await?;
        for ((_, image), outcome) in jobs.iter().zip(&outcomes) {
            match outcome {
                UploadOutcome::Stored(_) => println!("  ✔ {}", image.meta.name),
                UploadOutcome::Failed(message) => println!("  ✖ {}: {}", image.meta.name, message),
                UploadOutcome::Superseded | UploadOutcome::SlotGone => {}
            }
        }
    }

    let submission = SubmissionBuilder::new(kind, args.room.clone())
        .realtor_id(ctx.session.user_id())
        .saved_rooms(ctx.session.saved_rooms()?)
        .build(action, &list);
    info!(room = %args.room, features = submission.features().len(), "submitting room");

    let dispatched = ProjectDispatcher::new(&client, &mut ctx.session, kind)
        .dispatch(
            &submission,
            &name,
            RoomState {
                list: &mut list,
                uploads: &mut uploads,
                wizard: &mut wizard,
            },
        )
        .await?;

    print_notice(&dispatched.notice);
    match dispatched.route {
        Some(route) => print_route(&route),
        None => println!("  次の部屋: dazl project add-room / dazl project submit"),
    }
    Ok(())
}
