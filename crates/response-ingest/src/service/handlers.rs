//! Handler side effects on the messages bucket.

use shared_types::{CopyId, CopyTags, Owner, ResponderResult};
use tracing::{debug, info};

use crate::domain::{next_read, ReadOutcome, ReadTransition};
use crate::ports::{Bucket, ObjectStore};
use responder_telemetry::COPIES_EXPIRED;

/// Count one read of a tracked copy, deleting it at its limit.
///
/// A copy that is already gone is a normal outcome: it may have expired or
/// been deleted between sending and this read.
pub async fn advance_read_counter<S: ObjectStore + ?Sized>(
    store: &S,
    owner: &Owner,
    copy_id: &CopyId,
) -> ResponderResult<ReadOutcome> {
    let copy_key = owner.copy_key(copy_id);

    let tags = match store.get_tags(Bucket::Messages, &copy_key).await {
        Ok(tags) => CopyTags::new(tags),
        Err(err) if err.is_not_found() => {
            debug!(copy_id = %copy_id, "Copy already gone, nothing to count");
            return Ok(ReadOutcome::AlreadyGone);
        }
        Err(err) => return Err(err.into()),
    };

    match next_read(tags)? {
        ReadTransition::Counted(tags) => {
            let reads = tags.reads()?;
            store
                .put_tags(Bucket::Messages, &copy_key, tags.into_tags())
                .await?;
            debug!(copy_id = %copy_id, reads, "Read counted");
            Ok(ReadOutcome::Counted { reads })
        }
        ReadTransition::Expired { reads } => {
            store.delete_object(Bucket::Messages, &copy_key).await?;
            store
                .delete_object(Bucket::Messages, &owner.invite_image_key(copy_id))
                .await?;
            COPIES_EXPIRED.inc();
            info!(copy_id = %copy_id, reads, "Copy reached max reads and was deleted");
            Ok(ReadOutcome::Expired { reads })
        }
    }
}

/// Delete a recipient's own copy. Only ever touches the copies namespace.
pub async fn delete_copy<S: ObjectStore + ?Sized>(
    store: &S,
    owner: &Owner,
    copy_id: &CopyId,
) -> ResponderResult<()> {
    store
        .delete_object(Bucket::Messages, &owner.copy_key(copy_id))
        .await?;
    info!(copy_id = %copy_id, "Copy deleted by recipient");
    Ok(())
}
