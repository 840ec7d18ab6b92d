use aws_sdk_cloudwatchlogs::types::error::{
    DataAlreadyAcceptedException, InvalidSequenceTokenException, ResourceAlreadyExistsException,
    ResourceNotFoundException,
};
use cool_asserts::assert_matches;

use super::*;

#[test]
fn existing_stream_should_map_to_already_exists() {
    let err = CreateLogStreamError::ResourceAlreadyExistsException(
        ResourceAlreadyExistsException::builder()
            .message("The specified log stream already exists")
            .build(),
    );

    assert_matches!(map_create_error(err), LogSinkError::AlreadyExists);
}

#[test]
fn missing_log_group_should_map_to_not_found() {
    let err = CreateLogStreamError::ResourceNotFoundException(
        ResourceNotFoundException::builder()
            .message("The specified log group does not exist")
            .build(),
    );

    assert_matches!(map_create_error(err), LogSinkError::NotFound(_));
}

#[test]
fn stale_token_should_carry_the_expected_token() {
    let err = PutLogEventsError::InvalidSequenceTokenException(
        InvalidSequenceTokenException::builder()
            .expected_sequence_token("49590302913457641442")
            .build(),
    );

    assert_matches!(
        map_put_error(err),
        LogSinkError::InvalidSequenceToken { expected: Some(token) } => {
            assert_eq!(token, "49590302913457641442");
        }
    );
}

#[test]
fn duplicate_batch_should_map_to_already_accepted() {
    let err = PutLogEventsError::DataAlreadyAcceptedException(
        DataAlreadyAcceptedException::builder().build(),
    );

    assert_matches!(map_put_error(err), LogSinkError::DataAlreadyAccepted);
}
