//! Calls into the `rss` module of the feed package, argument order matching
//! the Move signatures exactly.
//!
//! Single calls take a builder so they can be composed; the `*_tx` functions
//! assemble the complete transactions a publisher submits.

use super::builder::{nested, ProgrammableTransactionBuilder};
use super::kind::{Argument, ObjectArg, ObjectRef, TransactionKind};
use super::TxError;
use crate::schema::{Address, ChannelFields, ObjectId};

pub const RSS_MODULE: &str = "rss";

/// Metadata keys written for both channels and items, in order.
pub const FIELD_KEYS: [&str; 3] = ["title", "link", "description"];

/// Entry points of one deployed feed package.
#[derive(Debug, Clone, Copy)]
pub struct RssPackage {
    pub package: ObjectId,
}

impl RssPackage {
    pub fn new(package: ObjectId) -> Self {
        Self { package }
    }

    fn call(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        function: &str,
        arguments: Vec<Argument>,
    ) -> Result<Argument, TxError> {
        ptb.move_call(self.package, RSS_MODULE, function, arguments)
    }

    /// `print_rss(&RSS, limit: u64, offset: u64, &Clock): String`
    pub fn print_rss(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        rss: Argument,
        limit: u64,
        offset: u64,
    ) -> Result<Argument, TxError> {
        let limit = ptb.pure(&limit)?;
        let offset = ptb.pure(&offset)?;
        let clock = ptb.clock()?;
        self.call(ptb, "print_rss", vec![rss, limit, offset, clock])
    }

    /// `new_rss(&mut RSSRegistry, &SuinsRegistration, &Clock): (RSS, RSSAdminCap)`
    pub fn new_rss(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        registry: Argument,
        suins: Argument,
    ) -> Result<(Argument, Argument), TxError> {
        let clock = ptb.clock()?;
        let result = self.call(ptb, "new_rss", vec![registry, suins, clock])?;
        Ok((nested(result, 0), nested(result, 1)))
    }

    /// `set_metadata(&mut RSS, &RSSAdminCap, keys, values, &Clock)`
    pub fn set_metadata(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        rss: Argument,
        cap: Argument,
        keys: &[&str],
        values: &[String],
    ) -> Result<Argument, TxError> {
        let keys = ptb.pure(&keys)?;
        let values = ptb.pure(&values)?;
        let clock = ptb.clock()?;
        self.call(ptb, "set_metadata", vec![rss, cap, keys, values, clock])
    }

    /// `share_rss(RSS)`
    pub fn share_rss(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        rss: Argument,
    ) -> Result<Argument, TxError> {
        self.call(ptb, "share_rss", vec![rss])
    }

    /// `add_item(&mut RSS, keys, values, &Clock): AdminAuth`
    pub fn add_item(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        rss: Argument,
        keys: &[&str],
        values: &[String],
    ) -> Result<Argument, TxError> {
        let keys = ptb.pure(&keys)?;
        let values = ptb.pure(&values)?;
        let clock = ptb.clock()?;
        self.call(ptb, "add_item", vec![rss, keys, values, clock])
    }

    /// `confirm_admin(AdminAuth, &RSSAdminCap)`: consumes the hot potato
    /// returned by `add_item`, proving the sender holds the cap.
    pub fn confirm_admin(
        &self,
        ptb: &mut ProgrammableTransactionBuilder,
        auth: Argument,
        cap: Argument,
    ) -> Result<Argument, TxError> {
        self.call(ptb, "confirm_admin", vec![auth, cap])
    }
}

fn trimmed_values(fields: &ChannelFields) -> Vec<String> {
    [&fields.title, &fields.link, &fields.description]
        .iter()
        .map(|s| s.trim().to_string())
        .collect()
}

/// Read-only render of a feed page, for dev-inspect.
pub fn print_rss_tx(
    package: RssPackage,
    feed: ObjectArg,
    limit: u64,
    offset: u64,
) -> Result<TransactionKind, TxError> {
    let mut ptb = ProgrammableTransactionBuilder::new();
    let rss = ptb.object(feed)?;
    package.print_rss(&mut ptb, rss, limit, offset)?;
    Ok(ptb.finish())
}

/// Registers a feed for an owned SuiNS name, sets its channel fields, shares
/// it, and hands the admin cap to `sender`.
pub fn create_feed_tx(
    package: RssPackage,
    registry: ObjectArg,
    suins: ObjectRef,
    fields: &ChannelFields,
    sender: Address,
) -> Result<TransactionKind, TxError> {
    let mut ptb = ProgrammableTransactionBuilder::new();
    let registry = ptb.object(registry)?;
    let suins = ptb.object(ObjectArg::ImmOrOwnedObject(suins))?;
    let (rss, cap) = package.new_rss(&mut ptb, registry, suins)?;
    package.set_metadata(&mut ptb, rss, cap, &FIELD_KEYS, &trimmed_values(fields))?;
    package.share_rss(&mut ptb, rss)?;
    let recipient = ptb.pure(&sender)?;
    ptb.transfer_objects(vec![cap], recipient)?;
    Ok(ptb.finish())
}

/// Replaces the channel fields of an existing feed.
pub fn edit_feed_tx(
    package: RssPackage,
    feed: ObjectArg,
    cap: ObjectRef,
    fields: &ChannelFields,
) -> Result<TransactionKind, TxError> {
    let mut ptb = ProgrammableTransactionBuilder::new();
    let rss = ptb.object(feed)?;
    let cap = ptb.object(ObjectArg::ImmOrOwnedObject(cap))?;
    package.set_metadata(&mut ptb, rss, cap, &FIELD_KEYS, &trimmed_values(fields))?;
    Ok(ptb.finish())
}

/// Publishes one item; `item` uses the same three keys as the channel.
pub fn post_item_tx(
    package: RssPackage,
    feed: ObjectArg,
    cap: ObjectRef,
    item: &ChannelFields,
) -> Result<TransactionKind, TxError> {
    let mut ptb = ProgrammableTransactionBuilder::new();
    let rss = ptb.object(feed)?;
    let auth = package.add_item(&mut ptb, rss, &FIELD_KEYS, &trimmed_values(item))?;
    let cap = ptb.object(ObjectArg::ImmOrOwnedObject(cap))?;
    package.confirm_admin(&mut ptb, auth, cap)?;
    Ok(ptb.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use crate::tx::kind::{CallArg, Command, ObjectDigest, ProgrammableTransaction};
    use pretty_assertions::assert_eq;

    fn package() -> RssPackage {
        RssPackage::new("0xabc".parse().unwrap())
    }

    fn feed_arg(mutable: bool) -> ObjectArg {
        ObjectArg::SharedObject {
            id: Address::new([9; 32]),
            initial_shared_version: 12,
            mutable,
        }
    }

    fn owned(b: u8) -> ObjectRef {
        ObjectRef {
            object_id: Address::new([b; 32]),
            version: 4,
            digest: ObjectDigest::new([b; 32]),
        }
    }

    fn unwrap_pt(kind: TransactionKind) -> ProgrammableTransaction {
        let TransactionKind::ProgrammableTransaction(pt) = kind;
        pt
    }

    fn call_of(command: &Command) -> (&str, &[Argument]) {
        match command {
            Command::MoveCall(call) => (call.function.as_str(), call.arguments.as_slice()),
            other => panic!("expected MoveCall, got {:?}", other),
        }
    }

    #[test]
    fn test_print_rss_layout() {
        let pt = unwrap_pt(print_rss_tx(package(), feed_arg(false), 2, 5).unwrap());
        assert_eq!(
            pt.inputs,
            vec![
                CallArg::Object(feed_arg(false)),
                CallArg::Pure(2u64.to_le_bytes().to_vec()),
                CallArg::Pure(5u64.to_le_bytes().to_vec()),
                CallArg::Object(ObjectArg::CLOCK),
            ]
        );
        assert_eq!(pt.commands.len(), 1);
        let (function, args) = call_of(&pt.commands[0]);
        assert_eq!(function, "print_rss");
        assert_eq!(
            args,
            &[
                Argument::Input(0),
                Argument::Input(1),
                Argument::Input(2),
                Argument::Input(3)
            ]
        );
        match &pt.commands[0] {
            Command::MoveCall(call) => {
                assert_eq!(call.module, RSS_MODULE);
                assert_eq!(call.package, package().package);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_create_feed_sequence() {
        let fields = ChannelFields {
            title: "  My Blog ".into(),
            link: "https://blog.example".into(),
            description: "notes\n".into(),
        };
        let registry = ObjectArg::SharedObject {
            id: Address::new([1; 32]),
            initial_shared_version: 2,
            mutable: true,
        };
        let sender = Address::new([7; 32]);
        let pt = unwrap_pt(create_feed_tx(package(), registry, owned(3), &fields, sender).unwrap());

        let functions: Vec<_> = pt
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::MoveCall(call) => Some(call.function.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(functions, vec!["new_rss", "set_metadata", "share_rss"]);

        // registry, suins, clock, keys, values, sender; the clock appears once
        assert_eq!(pt.inputs.len(), 6);
        let values = schema::encode(&vec![
            "My Blog".to_string(),
            "https://blog.example".to_string(),
            "notes".to_string(),
        ])
        .unwrap();
        assert_eq!(pt.inputs[4], CallArg::Pure(values));
        assert_eq!(
            pt.inputs[3],
            CallArg::Pure(schema::encode(&FIELD_KEYS.to_vec()).unwrap())
        );

        let (_, set_args) = call_of(&pt.commands[1]);
        assert_eq!(set_args[0], Argument::NestedResult(0, 0));
        assert_eq!(set_args[1], Argument::NestedResult(0, 1));
        assert_eq!(
            pt.commands[3],
            Command::TransferObjects(vec![Argument::NestedResult(0, 1)], Argument::Input(5))
        );
    }

    #[test]
    fn test_post_item_confirms_admin() {
        let item = ChannelFields {
            title: "Hello".into(),
            link: "https://blog.example/1".into(),
            description: "first".into(),
        };
        let pt = unwrap_pt(post_item_tx(package(), feed_arg(true), owned(5), &item).unwrap());
        let (add, add_args) = call_of(&pt.commands[0]);
        assert_eq!(add, "add_item");
        assert_eq!(add_args.len(), 4);
        let (confirm, confirm_args) = call_of(&pt.commands[1]);
        assert_eq!(confirm, "confirm_admin");
        assert_eq!(confirm_args[0], Argument::Result(0));
        assert_eq!(
            pt.inputs.last(),
            Some(&CallArg::Object(ObjectArg::ImmOrOwnedObject(owned(5))))
        );
    }

    #[test]
    fn test_edit_feed_uses_cap() {
        let pt = unwrap_pt(
            edit_feed_tx(package(), feed_arg(true), owned(6), &ChannelFields::default()).unwrap(),
        );
        let (function, args) = call_of(&pt.commands[0]);
        assert_eq!(function, "set_metadata");
        assert_eq!(args.len(), 5);
        assert_eq!(
            pt.inputs[1],
            CallArg::Object(ObjectArg::ImmOrOwnedObject(owned(6)))
        );
    }
}
