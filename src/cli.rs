use clap::{Args, Parser, Subcommand};
use dazl_common::payload::ProjectKind;
use dazl_common::report::BidStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dazl")]
#[command(about = "Dazl 不動産サービスクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// アカウント登録
    Signup {
        #[command(subcommand)]
        account: SignupCommand,
    },

    /// ログイン
    Login {
        #[arg(long)]
        email: String,

        /// 省略時は対話入力
        #[arg(long)]
        password: Option<String>,
    },

    /// ログアウト（セッションを消去）
    Logout,

    /// PHD作成ウィザード（エージェント）
    Phd {
        #[command(subcommand)]
        step: PhdCommand,
    },

    /// 部屋・設備の登録
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },

    /// お問い合わせ
    Contact(ContactArgs),

    /// エージェントプロフィール
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// PHDレポート
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },

    /// 専門業者向け案件
    Opportunity {
        #[command(subcommand)]
        action: OpportunityCommand,
    },

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum SignupCommand {
    /// エージェント登録
    Agent(AgentSignupArgs),
    /// ホームオーナー登録
    Customer(CustomerSignupArgs),
}

#[derive(Args)]
pub struct AgentSignupArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    /// 電話番号
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub company_name: String,
    #[arg(long, default_value = "")]
    pub street_address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip: String,
    /// 利用規約に同意
    #[arg(long)]
    pub agree_to_terms: bool,
}

#[derive(Args)]
pub struct CustomerSignupArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub zip_code: String,
    /// 電話番号（数字のみ）
    #[arg(long)]
    pub number: String,
    /// 利用規約に同意
    #[arg(long)]
    pub agree_to_terms: bool,
}

#[derive(Subcommand)]
pub enum PhdCommand {
    /// ステップ1: 売主情報
    Start {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// 物件所在地
        #[arg(long)]
        location: String,
    },

    /// ステップ2: 価格レンジ
    Price {
        #[arg(long)]
        low: String,
        #[arg(long)]
        high: String,
        /// スライダー値（省略時は中央値）
        #[arg(long)]
        value: Option<u32>,
    },

    /// 部屋の一覧
    Rooms,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum KindArg {
    /// エージェント案件
    Realtor,
    /// ホームオーナー案件
    HomeOwner,
}

impl From<KindArg> for ProjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Realtor => ProjectKind::Realtor,
            KindArg::HomeOwner => ProjectKind::HomeOwner,
        }
    }
}

#[derive(Args)]
pub struct RoomArgs {
    /// 部屋ID
    #[arg(long)]
    pub room: String,

    /// 部屋名（省略時は選択済みの部屋名）
    #[arg(long)]
    pub name: Option<String>,

    /// 案件の種類（省略時はログイン種別から判定）
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// チェックする設備ID
    #[arg(long = "check")]
    pub checks: Vec<u64>,

    /// 設備メモ（FEATURE_ID=テキスト）
    #[arg(long = "note")]
    pub notes: Vec<String>,

    /// 設備画像（FEATURE_ID=PATH[:説明]）
    #[arg(long = "image")]
    pub images: Vec<String>,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// 部屋の設備一覧を表示
    Features {
        #[arg(long)]
        room: String,
    },

    /// 部屋を保存して次の部屋へ（Add another room）
    AddRoom(RoomArgs),

    /// 現在の部屋を含めて送信
    Submit(RoomArgs),
}

#[derive(Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub member_name: String,
    #[arg(long)]
    pub property_address: String,
    #[arg(long)]
    pub company_name: String,
    #[arg(long)]
    pub contact_name: String,
    #[arg(long)]
    pub describe_issue: String,
    #[arg(long)]
    pub steps_to_resolve: String,
    #[arg(long)]
    pub how_issue_resolved: String,

    /// 添付画像（PATH[:説明]）
    #[arg(long = "image")]
    pub images: Vec<String>,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// プロフィールを表示
    Show,
    /// プロフィールを更新（指定した項目のみ）
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zip_code: Option<String>,
        #[arg(long)]
        number: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// PHDレポートを表示
    View { id: String },

    /// 部屋の入札ステータスを設定
    Bid {
        id: String,
        #[arg(long)]
        room: String,
        /// Bid / D.I.Y / Pass
        #[arg(long, value_parser = parse_bid_status)]
        status: BidStatus,
    },

    /// レポートPDFをメール送信
    Mail {
        id: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum OpportunityCommand {
    /// 案件を表示
    View { id: String },

    /// ホームオーナーへ返信
    Respond {
        id: String,
        /// 興味あり
        #[arg(long, conflicts_with = "decline")]
        interested: bool,
        /// 辞退
        #[arg(long)]
        decline: bool,
        #[arg(long, default_value = "")]
        message: String,
        /// 辞退の確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 案件を削除
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_bid_status(s: &str) -> Result<BidStatus, String> {
    BidStatus::parse(s).ok_or_else(|| format!("Unknown status: {}. Use Bid, D.I.Y or Pass", s))
}

/// `KEY=VALUE` を分割
pub fn split_assignment(input: &str) -> Result<(u64, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("FEATURE_ID=VALUE の形式で指定してください: {}", input))?;
    let id = key
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("設備IDが不正です: {}", key))?;
    Ok((id, value.to_string()))
}

/// `PATH[:説明]` を分割（Windowsのドライブ文字は区切りとみなさない）
pub fn split_image_arg(input: &str) -> (PathBuf, String) {
    let search_from = if input.len() > 2 && input.as_bytes()[1] == b':' { 2 } else { 0 };
    match input[search_from..].find(':') {
        Some(pos) => {
            let pos = search_from + pos;
            (PathBuf::from(&input[..pos]), input[pos + 1..].to_string())
        }
        None => (PathBuf::from(input), String::new()),
    }
}
