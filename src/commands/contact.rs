//! お問い合わせ

use super::{print_notice, Context};
use crate::cli::{split_image_arg, ContactArgs};
use crate::error::{DazlError, Result};
use crate::project::{upload_all, LocalImage};
use dazl_common::api::{ApiMessage, Endpoint};
use dazl_common::feature_list::PhotoList;
use dazl_common::forms::ContactRequest;
use dazl_common::notice::Notice;
use dazl_common::upload::UploadSlots;
use dazl_common::validation::FormValues;

pub use dazl_common::notice::CONTACT_SENT;

pub fn contact_values(args: &ContactArgs) -> FormValues {
    FormValues::new()
        .with_text("memberName", args.member_name.clone())
        .with_text("propertyAddress", args.property_address.clone())
        .with_text("companyName", args.company_name.clone())
        .with_text("contactName", args.contact_name.clone())
        .with_text("describeIssue", args.describe_issue.clone())
        .with_text("stepsToResolve", args.steps_to_resolve.clone())
        .with_text("howIssueResolved", args.how_issue_resolved.clone())
}

pub async fn send(ctx: &mut Context, args: ContactArgs) -> Result<()> {
    let values = contact_values(&args);
    ContactRequest::schema().validate(&values)?;

    let client = ctx.client()?;
    let mut photos = PhotoList::default();
    let mut uploads = UploadSlots::new();

    if !args.images.is_empty() {
        // 画像アップロードはログインが必要
        ctx.require_login()?;
        let mut jobs = Vec::new();
        for (i, arg) in args.images.iter().enumerate() {
            let (path, description) = split_image_arg(arg);
            let slot = if i == 0 { photos.slots()[0].id } else { photos.append() };
            photos.set_description(slot, description);
            jobs.push((slot, LocalImage::from_path(&path)?));
        }
        upload_all(&client, &mut uploads, &mut photos, &jobs).await?;
        uploads.ensure_ready(&photos).map_err(DazlError::UploadPending)?;
    }

    let request = ContactRequest::from_values(&values, photos.uploaded());
    let endpoint = Endpoint::contact(ctx.session.is_logged_in());
    let response: ApiMessage = client.post_json(&endpoint, &request).await?;

    print_notice(&Notice::server_success(&response.message, CONTACT_SENT));
    Ok(())
}
