mod abort;
mod end_to_end;
mod idempotence;
mod limits;
mod migration;
