//! ISO 639-3 language codes, sorted for binary search.

pub(crate) static ISO639_3_CODES: &[&str] = &[
    "aaa", "aab", "aac", "aad", "aae", "aaf", "aag", "aah", "aai", "aak", "aal", "aam",
    "aan", "aao", "aap", "aaq", "aar", "aas", "aat", "aau", "aaw", "aax", "aay", "aaz",
    "aba", "abb", "abc", "abd", "abe", "abf", "abg", "abh", "abi", "abj", "abk", "abl",
    "abm", "abn", "abo", "abp", "abq", "abr", "abs", "abt", "abu", "abv", "abw", "abx",
    "aby", "abz", "aca", "acb", "acc", "acd", "ace", "acf", "ach", "aci", "ack", "acl",
    "acm", "acn", "acp", "acq", "acr", "acs", "act", "acu", "acv", "acw", "acx", "acy",
    "acz", "ada", "adb", "add", "ade", "adf", "adg", "adh", "adi", "adj", "adl", "adn",
    "ado", "adp", "adq", "adr", "ads", "adt", "adu", "adw", "adx", "ady", "adz", "aea",
    "aeb", "aec", "aed", "aee", "aek", "ael", "aem", "aen", "aeq", "aer", "aes", "aeu",
    "aew", "aex", "aey", "aez", "afb", "afd", "afe", "afg", "afh", "afi", "afk", "afn",
    "afo", "afp", "afr", "afs", "aft", "afu", "afz", "aga", "agb", "agc", "agd", "age",
    "agf", "agg", "agh", "agi", "agj", "agk", "agl", "agm", "agn", "ago", "agp", "agq",
    "agr", "ags", "agt", "agu", "agv", "agw", "agx", "agy", "agz", "aha", "ahb", "ahe",
    "ahg", "ahh", "ahi", "ahk", "ahl", "ahm", "ahn", "aho", "ahp", "ahr", "ahs", "aht",
    "aia", "aib", "aic", "aid", "aie", "aif", "aig", "aih", "aii", "aij", "aik", "ail",
    "aim", "ain", "aio", "aip", "aiq", "air", "ais", "ait", "aiw", "aix", "aiy", "aiz",
    "aja", "ajg", "aji", "ajn", "ajp", "ajs", "ajt", "aju", "ajw", "ajz", "aka", "akb",
    "akc", "akd", "ake", "akf", "akg", "akh", "aki", "akj", "akk", "akl", "akm", "akn",
    "ako", "akp", "akq", "akr", "aks", "akt", "aku", "akv", "akw", "akx", "aky", "akz",
    "ala", "alc", "ald", "ale", "alf", "alh", "ali", "alj", "alk", "all", "alm", "aln",
    "alo", "alp", "alq", "alr", "als", "alt", "alu", "alw", "alx", "aly", "alz", "ama",
    "amb", "amc", "amd", "ame", "amf", "amg", "amh", "ami", "amj", "amk", "aml", "amm",
    "amn", "amo", "amp", "amq", "amr", "ams", "amt", "amu", "amv", "amw", "amx", "amy",
    "amz", "ana", "anb", "anc", "and", "ane", "anf", "ang", "anh", "ani", "anj", "ank",
    "anl", "anm", "ann", "ano", "anp", "anq", "anr", "ans", "ant", "anu", "anv", "anw",
    "anx", "any", "anz", "aoa", "aob", "aoc", "aod", "aoe", "aof", "aog", "aoh", "aoi",
    "aoj", "aok", "aol", "aom", "aon", "aor", "aos", "aot", "aou", "aox", "aoz", "apb",
    "apc", "apd", "ape", "apf", "apg", "aph", "api", "apj", "apk", "apl", "apm", "apn",
    "apo", "app", "apq", "apr", "aps", "apt", "apu", "apv", "apw", "apx", "apy", "apz",
    "aqc", "aqd", "aqg", "aqk", "aqm", "aqn", "aqp", "aqr", "aqt", "aqz", "ara", "arb",
    "arc", "ard", "are", "arf", "arg", "arh", "ari", "arj", "ark", "arl", "arn", "aro",
    "arp", "arq", "arr", "ars", "aru", "arv", "arw", "arx", "ary", "arz", "asa", "asb",
    "asc", "asd", "ase", "asf", "asg", "ash", "asi", "asj", "ask", "asl", "asm", "asn",
    "aso", "asp", "asq", "asr", "ass", "ast", "asu", "asv", "asw", "asx", "asy", "asz",
    "ata", "atb", "atc", "atd", "ate", "atf", "atg", "ati", "atj", "atk", "atl", "atm",
    "atn", "ato", "atp", "atq", "atr", "ats", "att", "atu", "atv", "atw", "atx", "aty",
    "atz", "aua", "aub", "auc", "aud", "aue", "aug", "auh", "aui", "auj", "auk", "aul",
    "aum", "aun", "auo", "aup", "auq", "aur", "aut", "auu", "auv", "auw", "aux", "auy",
    "auz", "ava", "avb", "avd", "ave", "avi", "avk", "avl", "avm", "avn", "avo", "avs",
    "avt", "avu", "avv", "awa", "awb", "awc", "awe", "awg", "awh", "awi", "awk", "awm",
    "awn", "awo", "awr", "aws", "awt", "awu", "awv", "aww", "awx", "awy", "axb", "axe",
    "axg", "axk", "axl", "axm", "axx", "aya", "ayb", "ayc", "ayd", "aye", "ayg", "ayh",
    "ayi", "ayk", "ayl", "aym", "ayn", "ayo", "ayp", "ayq", "ayr", "ays", "ayt", "ayu",
    "ayx", "ayy", "ayz", "aza", "azb", "azd", "aze", "azg", "azj", "azm", "azn", "azo",
    "azr", "azt", "azz", "baa", "bab", "bac", "bae", "baf", "bag", "bah", "baj", "bak",
    "bal", "bam", "ban", "bao", "bap", "bar", "bas", "bau", "bav", "baw", "bax", "bay",
    "baz", "bba", "bbb", "bbc", "bbd", "bbe", "bbf", "bbg", "bbh", "bbi", "bbj", "bbk",
    "bbl", "bbm", "bbn", "bbo", "bbp", "bbq", "bbr", "bbs", "bbt", "bbu", "bbv", "bbw",
    "bbx", "bby", "bbz", "bca", "bcb", "bcc", "bcd", "bce", "bcf", "bcg", "bch", "bci",
    "bcj", "bck", "bcl", "bcm", "bcn", "bco", "bcp", "bcq", "bcr", "bcs", "bct", "bcu",
    "bcv", "bcw", "bcx", "bcy", "bcz", "bda", "bdb", "bdc", "bdd", "bde", "bdf", "bdg",
    "bdh", "bdi", "bdj", "bdk", "bdl", "bdm", "bdn", "bdo", "bdp", "bdq", "bdr", "bds",
    "bdt", "bdu", "bdv", "bdw", "bdx", "bdy", "bdz", "bea", "beb", "bec", "bed", "bee",
    "bef", "beg", "beh", "bei", "bej", "bek", "bel", "bem", "ben", "beo", "bep", "beq",
    "bes", "bet", "beu", "bev", "bew", "bex", "bey", "bez", "bfa", "bfb", "bfc", "bfd",
    "bfe", "bff", "bfg", "bfh", "bfi", "bfj", "bfk", "bfl", "bfm", "bfn", "bfo", "bfp",
    "bfq", "bfr", "bfs", "bft", "bfu", "bfw", "bfx", "bfy", "bfz", "bga", "bgb", "bgc",
    "bgd", "bge", "bgf", "bgg", "bgh", "bgi", "bgj", "bgk", "bgl", "bgm", "bgn", "bgo",
    "bgp", "bgq", "bgr", "bgs", "bgt", "bgu", "bgv", "bgw", "bgx", "bgy", "bgz", "bha",
    "bhb", "bhc", "bhd", "bhe", "bhf", "bhg", "bhh", "bhi", "bhj", "bhk", "bhl", "bhm",
    "bhn", "bho", "bhp", "bhq", "bhr", "bhs", "bht", "bhu", "bhv", "bhw", "bhx", "bhy",
    "bhz", "bia", "bib", "bic", "bid", "bie", "bif", "big", "bii", "bij", "bik", "bil",
    "bim", "bin", "bio", "bip", "biq", "bir", "bis", "bit", "biu", "biv", "biw", "bix",
    "biy", "biz", "bja", "bjb", "bjc", "bjd", "bje", "bjf", "bjg", "bjh", "bji", "bjj",
    "bjk", "bjl", "bjm", "bjn", "bjo", "bjp", "bjq", "bjr", "bjs", "bjt", "bju", "bjv",
    "bjw", "bjx", "bjy", "bjz", "bka", "bkb", "bkc", "bkd", "bke", "bkf", "bkg", "bkh",
    "bki", "bkj", "bkk", "bkl", "bkm", "bkn", "bko", "bkp", "bkq", "bkr", "bks", "bkt",
    "bku", "bkv", "bkw", "bkx", "bky", "bkz", "bla", "blb", "blc", "bld", "ble", "blf",
    "blg", "blh", "bli", "blj", "blk", "bll", "blm", "bln", "blo", "blp", "blq", "blr",
    "bls", "blt", "blu", "blv", "blw", "blx", "bly", "blz", "bma", "bmb", "bmc", "bmd",
    "bme", "bmf", "bmg", "bmh", "bmi", "bmj", "bmk", "bml", "bmm", "bmn", "bmo", "bmp",
    "bmq", "bmr", "bms", "bmt", "bmu", "bmv", "bmw", "bmx", "bmy", "bmz", "bna", "bnb",
    "bnc", "bnd", "bne", "bnf", "bng", "bnh", "bni", "bnj", "bnk", "bnl", "bnm", "bnn",
    "bno", "bnp", "bnq", "bnr", "bns", "bnu", "bnv", "bnw", "bnx", "bny", "bnz", "boa",
    "bob", "boc", "bod", "boe", "bof", "bog", "boh", "boi", "boj", "bok", "bol", "bom",
    "bon", "boo", "bop", "boq", "bor", "bos", "bot", "bou", "bov", "bow", "box", "boy",
    "boz", "bpa", "bpb", "bpc", "bpd", "bpe", "bpg", "bph", "bpi", "bpj", "bpk", "bpl",
    "bpm", "bpn", "bpo", "bpp", "bpq", "bpr", "bps", "bpt", "bpu", "bpv", "bpw", "bpx",
    "bpy", "bpz", "bqa", "bqb", "bqc", "bqd", "bqe", "bqf", "bqg", "bqh", "bqi", "bqj",
    "bqk", "bql", "bqm", "bqn", "bqo", "bqp", "bqq", "bqr", "bqs", "bqt", "bqu", "bqv",
    "bqw", "bqx", "bqy", "bqz", "bra", "brb", "brc", "brd", "bre", "brf", "brg", "brh",
    "bri", "brj", "brk", "brl", "brm", "brn", "bro", "brp", "brq", "brr", "brs", "brt",
    "bru", "brv", "brw", "brx", "bry", "brz", "bsa", "bsb", "bsc", "bsd", "bse", "bsf",
    "bsg", "bsh", "bsi", "bsj", "bsk", "bsl", "bsm", "bsn", "bso", "bsp", "bsq", "bsr",
    "bss", "bst", "bsu", "bsv", "bsw", "bsx", "bsy", "bsz", "bta", "btb", "btc", "btd",
    "bte", "btf", "btg", "bth", "bti", "btj", "btl", "btm", "btn", "bto", "btp", "btq",
    "btr", "bts", "btt", "btu", "btv", "btw", "btx", "bty", "btz", "bua", "bub", "buc",
    "bud", "bue", "buf", "bug", "buh", "bui", "buj", "buk", "bul", "bum", "bun", "buo",
    "bup", "buq", "bus", "but", "buu", "buv", "buw", "bux", "buy", "buz", "bva", "bvb",
    "bvc", "bvd", "bve", "bvf", "bvg", "bvh", "bvi", "bvj", "bvk", "bvl", "bvm", "bvn",
    "bvo", "bvp", "bvq", "bvr", "bvs", "bvt", "bvu", "bvv", "bvw", "bvx", "bvy", "bvz",
    "bwa", "bwb", "bwc", "bwd", "bwe", "bwf", "bwg", "bwh", "bwi", "bwj", "bwk", "bwl",
    "bwm", "bwn", "bwo", "bwp", "bwq", "bwr", "bws", "bwt", "bwu", "bwv", "bww", "bwx",
    "bwy", "bwz", "bxa", "bxb", "bxc", "bxd", "bxe", "bxf", "bxg", "bxh", "bxi", "bxj",
    "bxk", "bxl", "bxm", "bxn", "bxo", "bxp", "bxq", "bxr", "bxs", "bxt", "bxu", "bxv",
    "bxw", "bxx", "bxz", "bya", "byb", "byc", "byd", "bye", "byf", "byg", "byh", "byi",
    "byj", "byk", "byl", "bym", "byn", "byo", "byp", "byq", "byr", "bys", "byt", "byu",
    "byv", "byw", "byx", "byy", "byz", "bza", "bzb", "bzc", "bzd", "bze", "bzf", "bzg",
    "bzh", "bzi", "bzj", "bzk", "bzl", "bzm", "bzn", "bzo", "bzp", "bzq", "bzr", "bzs",
    "bzt", "bzu", "bzv", "bzw", "bzx", "bzy", "bzz", "caa", "cab", "cac", "cad", "cae",
    "caf", "cag", "cah", "caj", "cak", "cal", "cam", "can", "cao", "cap", "caq", "car",
    "cas", "cat", "cav", "caw", "cax", "cay", "caz", "cbb", "cbc", "cbd", "cbe", "cbg",
    "cbh", "cbi", "cbj", "cbk", "cbl", "cbm", "cbn", "cbo", "cbq", "cbr", "cbs", "cbt",
    "cbu", "cbv", "cbw", "cby", "cca", "ccc", "ccd", "cce", "ccg", "cch", "ccj", "ccl",
    "ccm", "cco", "ccp", "ccq", "ccr", "ccx", "ccy", "cda", "cde", "cdf", "cdg", "cdh",
    "cdi", "cdj", "cdm", "cdn", "cdo", "cdr", "cds", "cdy", "cdz", "cea", "ceb", "ceg",
    "cek", "cen", "ces", "cet", "cey", "cfa", "cfd", "cfg", "cfm", "cga", "cgc", "cgg",
    "cgk", "cha", "chb", "chc", "chd", "che", "chf", "chg", "chh", "chj", "chk", "chl",
    "chm", "chn", "cho", "chp", "chq", "chr", "chs", "cht", "chu", "chv", "chw", "chx",
    "chy", "chz", "cia", "cib", "cic", "cid", "cie", "cih", "cik", "cim", "cin", "cip",
    "cir", "cit", "ciw", "ciy", "cja", "cje", "cjh", "cji", "cjk", "cjm", "cjn", "cjo",
    "cjp", "cjr", "cjs", "cjv", "cjy", "cka", "ckb", "ckc", "ckd", "cke", "ckf", "ckh",
    "cki", "ckj", "ckk", "ckl", "ckm", "ckn", "cko", "ckq", "ckr", "cks", "ckt", "cku",
    "ckv", "ckw", "ckx", "cky", "ckz", "cla", "clc", "cld", "cle", "clh", "cli", "clj",
    "clk", "cll", "clm", "clo", "cls", "clt", "clu", "clw", "cly", "cma", "cme", "cmg",
    "cmi", "cmk", "cml", "cmm", "cmn", "cmo", "cmr", "cms", "cmt", "cna", "cnb", "cnc",
    "cng", "cnh", "cni", "cnk", "cnl", "cnm", "cno", "cnp", "cnq", "cnr", "cns", "cnt",
    "cnu", "cnw", "cnx", "coa", "cob", "coc", "cod", "coe", "cof", "cog", "coh", "coj",
    "cok", "col", "com", "con", "coo", "cop", "coq", "cor", "cos", "cot", "cou", "cov",
    "cow", "cox", "coy", "coz", "cpa", "cpb", "cpc", "cpg", "cpi", "cpn", "cpo", "cps",
    "cpu", "cpx", "cpy", "cqd", "cqu", "cra", "crb", "crc", "crd", "cre", "crf", "crg",
    "crh", "cri", "crj", "crk", "crl", "crm", "crn", "cro", "crq", "crr", "crs", "crt",
    "cru", "crv", "crw", "crx", "cry", "crz", "csa", "csb", "csc", "csd", "cse", "csf",
    "csg", "csh", "csi", "csj", "csk", "csl", "csm", "csn", "cso", "csp", "csq", "csr",
    "css", "cst", "csv", "csw", "csx", "csy", "csz", "cta", "ctc", "ctd", "cte", "ctg",
    "cth", "cti", "ctl", "ctm", "ctn", "cto", "ctp", "cts", "ctt", "ctu", "cty", "ctz",
    "cua", "cub", "cuc", "cug", "cuh", "cui", "cuj", "cuk", "cul", "cum", "cun", "cuo",
    "cup", "cuq", "cur", "cut", "cuu", "cuv", "cuw", "cux", "cuy", "cvg", "cvn", "cwa",
    "cwb", "cwd", "cwe", "cwg", "cwt", "cxh", "cya", "cyb", "cym", "cyo", "czh", "czk",
    "czn", "czo", "czt", "daa", "dac", "dad", "dae", "daf", "dag", "dah", "dai", "daj",
    "dak", "dal", "dam", "dan", "dao", "dap", "daq", "dar", "das", "dat", "dau", "dav",
    "daw", "dax", "daz", "dba", "dbb", "dbd", "dbe", "dbf", "dbg", "dbi", "dbj", "dbl",
    "dbm", "dbn", "dbo", "dbp", "dbq", "dbr", "dbt", "dbu", "dbv", "dbw", "dby", "dcc",
    "dcr", "dda", "ddd", "dde", "ddg", "ddi", "ddj", "ddn", "ddo", "ddr", "dds", "ddw",
    "dec", "ded", "dee", "def", "deg", "deh", "dei", "dek", "del", "dem", "den", "dep",
    "deq", "der", "des", "deu", "dev", "dez", "dga", "dgb", "dgc", "dgd", "dge", "dgg",
    "dgh", "dgi", "dgk", "dgl", "dgn", "dgo", "dgr", "dgs", "dgt", "dgu", "dgw", "dgx",
    "dgz", "dha", "dhd", "dhg", "dhi", "dhl", "dhm", "dhn", "dho", "dhr", "dhs", "dhu",
    "dhv", "dhw", "dhx", "dia", "dib", "dic", "did", "dif", "dig", "dih", "dii", "dij",
    "dik", "dil", "dim", "din", "dio", "dip", "diq", "dir", "dis", "dit", "diu", "div",
    "diw", "dix", "diy", "diz", "dja", "djb", "djc", "djd", "dje", "djf", "dji", "djj",
    "djk", "djl", "djm", "djn", "djo", "djr", "dju", "djw", "dka", "dkg", "dkk", "dkl",
    "dkr", "dks", "dkx", "dlg", "dlk", "dlm", "dln", "dma", "dmb", "dmc", "dmd", "dme",
    "dmf", "dmg", "dmk", "dml", "dmm", "dmo", "dmr", "dms", "dmu", "dmv", "dmw", "dmx",
    "dmy", "dna", "dnd", "dne", "dng", "dni", "dnj", "dnk", "dnn", "dno", "dnr", "dnt",
    "dnu", "dnv", "dnw", "dny", "doa", "dob", "doc", "doe", "dof", "doh", "doi", "dok",
    "dol", "don", "doo", "dop", "doq", "dor", "dos", "dot", "dov", "dow", "dox", "doy",
    "doz", "dpp", "drb", "drc", "drd", "dre", "drg", "drh", "dri", "drl", "drn", "dro",
    "drq", "drr", "drs", "drt", "dru", "drw", "dry", "dsb", "dse", "dsh", "dsi", "dsk",
    "dsl", "dsn", "dso", "dsq", "dsz", "dta", "dtb", "dtd", "dth", "dti", "dtk", "dtm",
    "dtn", "dto", "dtp", "dtr", "dts", "dtt", "dtu", "dty", "dua", "dub", "duc", "dud",
    "due", "duf", "dug", "duh", "dui", "duj", "duk", "dul", "dum", "dun", "duo", "dup",
    "duq", "dur", "dus", "duu", "duv", "duw", "dux", "duy", "duz", "dva", "dwa", "dwk",
    "dwl", "dwr", "dws", "dwu", "dww", "dwy", "dwz", "dya", "dyb", "dyd", "dyg", "dyi",
    "dyk", "dym", "dyn", "dyo", "dyr", "dyu", "dyy", "dza", "dzd", "dze", "dzg", "dzl",
    "dzn", "dzo", "eaa", "ebc", "ebg", "ebk", "ebo", "ebr", "ebu", "ecr", "ecs", "ecy",
    "eee", "efa", "efe", "efi", "ega", "egl", "egm", "ego", "egy", "ehs", "ehu", "eip",
    "eit", "eiv", "eja", "eka", "ekc", "eke", "ekg", "eki", "ekk", "ekl", "ekm", "eko",
    "ekp", "ekr", "eky", "ele", "elh", "eli", "elk", "ell", "elm", "elo", "elp", "elu",
    "elx", "ema", "emb", "eme", "emg", "emi", "emk", "eml", "emm", "emn", "emo", "emp",
    "emq", "ems", "emu", "emw", "emx", "emy", "emz", "ena", "enb", "enc", "end", "enf",
    "eng", "enh", "eni", "enl", "enm", "enn", "eno", "enq", "enr", "enu", "env", "enw",
    "enx", "eot", "epi", "epo", "era", "erg", "erh", "eri", "erk", "ero", "err", "ers",
    "ert", "erw", "ese", "esg", "esh", "esi", "esk", "esl", "esm", "esn", "eso", "esq",
    "ess", "est", "esu", "esy", "etb", "etc", "eth", "etn", "eto", "etr", "ets", "ett",
    "etu", "etx", "etz", "eud", "eur", "eus", "eve", "evh", "evn", "ewe", "ewo", "ext",
    "eya", "eyo", "eza", "eze", "faa", "fab", "fad", "faf", "fag", "fah", "fai", "faj",
    "fak", "fal", "fam", "fan", "fao", "fap", "far", "fas", "fat", "fau", "fax", "fay",
    "faz", "fbl", "fcs", "fer", "ffi", "ffm", "fgr", "fia", "fie", "fif", "fij", "fil",
    "fin", "fip", "fir", "fit", "fiw", "fiz", "fkk", "fkv", "fla", "flh", "fli", "fll",
    "flm", "fln", "flr", "fly", "fmp", "fmu", "fnb", "fng", "fni", "fod", "foi", "fom",
    "fon", "for", "fos", "fpe", "fqs", "fra", "frc", "frd", "fri", "frk", "frm", "fro",
    "frp", "frq", "frr", "frs", "frt", "fry", "fse", "fsl", "fss", "fub", "fuc", "fud",
    "fue", "fuf", "fuh", "fui", "fuj", "ful", "fum", "fun", "fuq", "fur", "fut", "fuu",
    "fuv", "fuy", "fvr", "fwa", "fwe", "gaa", "gab", "gac", "gad", "gae", "gaf", "gag",
    "gah", "gai", "gaj", "gak", "gal", "gam", "gan", "gao", "gap", "gaq", "gar", "gas",
    "gat", "gau", "gav", "gaw", "gax", "gay", "gaz", "gba", "gbb", "gbc", "gbd", "gbe",
    "gbf", "gbg", "gbh", "gbi", "gbj", "gbk", "gbl", "gbm", "gbn", "gbo", "gbp", "gbq",
    "gbr", "gbs", "gbu", "gbv", "gbw", "gbx", "gby", "gbz", "gcc", "gcd", "gce", "gcf",
    "gcl", "gcn", "gcr", "gct", "gda", "gdb", "gdc", "gdd", "gde", "gdf", "gdg", "gdh",
    "gdi", "gdj", "gdk", "gdl", "gdm", "gdn", "gdo", "gdq", "gdr", "gds", "gdt", "gdu",
    "gdx", "gea", "geb", "gec", "ged", "gef", "geg", "geh", "gei", "gej", "gek", "gel",
    "gen", "geq", "ges", "gev", "gew", "gex", "gey", "gez", "gfk", "gft", "gfx", "gga",
    "ggb", "ggd", "gge", "ggg", "ggh", "ggk", "ggl", "ggm", "ggn", "ggo", "ggr", "ggt",
    "ggu", "ggw", "gha", "ghc", "ghe", "ghh", "ghk", "ghl", "ghn", "gho", "ghr", "ghs",
    "ght", "gia", "gib", "gic", "gid", "gie", "gig", "gih", "gii", "gil", "gim", "gin",
    "gio", "gip", "giq", "gir", "gis", "git", "giu", "giw", "gix", "giy", "giz", "gji",
    "gjk", "gjm", "gjn", "gjr", "gju", "gka", "gkd", "gke", "gkn", "gko", "gkp", "gku",
    "gla", "glb", "glc", "gld", "gle", "glg", "glh", "gli", "glj", "glk", "gll", "glo",
    "glr", "glu", "glv", "glw", "gly", "gma", "gmb", "gmd", "gmg", "gmh", "gml", "gmm",
    "gmn", "gmo", "gmr", "gmu", "gmv", "gmx", "gmy", "gmz", "gna", "gnb", "gnc", "gnd",
    "gne", "gng", "gnh", "gni", "gnj", "gnk", "gnl", "gnm", "gnn", "gno", "gnq", "gnr",
    "gnt", "gnu", "gnw", "gnz", "goa", "gob", "goc", "god", "goe", "gof", "gog", "goh",
    "goi", "goj", "gok", "gol", "gom", "gon", "goo", "gop", "goq", "gor", "gos", "got",
    "gou", "gov", "gow", "gox", "goy", "goz", "gpa", "gpe", "gpn", "gqa", "gqi", "gqn",
    "gqr", "gqu", "gra", "grb", "grc", "grd", "grg", "grh", "gri", "grj", "grm", "grn",
    "gro", "grq", "grr", "grs", "grt", "gru", "grv", "grw", "grx", "gry", "grz", "gsc",
    "gse", "gsg", "gsl", "gsm", "gsn", "gso", "gsp", "gss", "gsw", "gta", "gti", "gtu",
    "gua", "gub", "guc", "gud", "gue", "guf", "gug", "guh", "gui", "guj", "guk", "gul",
    "gum", "gun", "guo", "gup", "guq", "gur", "gus", "gut", "guu", "guv", "guw", "gux",
    "guz", "gva", "gvc", "gve", "gvf", "gvj", "gvl", "gvm", "gvn", "gvo", "gvp", "gvr",
    "gvs", "gvy", "gwa", "gwb", "gwc", "gwd", "gwe", "gwf", "gwg", "gwi", "gwj", "gwm",
    "gwn", "gwr", "gwt", "gwu", "gww", "gwx", "gxx", "gya", "gyb", "gyd", "gye", "gyf",
    "gyg", "gyi", "gyl", "gym", "gyn", "gyo", "gyr", "gyy", "gyz", "gza", "gzi", "gzn",
    "haa", "hab", "hac", "had", "hae", "haf", "hag", "hah", "hai", "haj", "hak", "hal",
    "ham", "han", "hao", "hap", "haq", "har", "has", "hat", "hau", "hav", "haw", "hax",
    "hay", "haz", "hba", "hbb", "hbn", "hbo", "hbs", "hbu", "hca", "hch", "hdn", "hds",
    "hdy", "hea", "heb", "hed", "heg", "heh", "hei", "hem", "her", "hgm", "hgw", "hhi",
    "hhr", "hhy", "hia", "hib", "hid", "hif", "hig", "hih", "hii", "hij", "hik", "hil",
    "hin", "hio", "hir", "hit", "hiw", "hix", "hji", "hka", "hke", "hkh", "hkk", "hkn",
    "hks", "hla", "hlb", "hld", "hle", "hlt", "hlu", "hma", "hmb", "hmc", "hmd", "hme",
    "hmf", "hmg", "hmh", "hmi", "hmj", "hmk", "hml", "hmm", "hmn", "hmo", "hmp", "hmq",
    "hmr", "hms", "hmt", "hmu", "hmv", "hmw", "hmy", "hmz", "hna", "hnd", "hne", "hng",
    "hnh", "hni", "hnj", "hnm", "hnn", "hno", "hns", "hnu", "hoa", "hob", "hoc", "hod",
    "hoe", "hoh", "hoi", "hoj", "hol", "hom", "hoo", "hop", "hor", "hos", "hot", "hov",
    "how", "hoy", "hoz", "hpo", "hps", "hra", "hrc", "hre", "hrk", "hrm", "hro", "hrp",
    "hrr", "hrt", "hru", "hrv", "hrw", "hrx", "hrz", "hsb", "hsf", "hsh", "hsl", "hsn",
    "hss", "hti", "hto", "hts", "htu", "htx", "hub", "huc", "hud", "hue", "huf", "hug",
    "huh", "hui", "huj", "huk", "hul", "hum", "hun", "huo", "hup", "huq", "hur", "hus",
    "hut", "huu", "huv", "huw", "hux", "huy", "huz", "hva", "hvc", "hve", "hvk", "hvn",
    "hvv", "hwa", "hwc", "hwo", "hya", "hye", "hyw", "iai", "ian", "iap", "iar", "iba",
    "ibb", "ibd", "ibe", "ibg", "ibh", "ibi", "ibl", "ibm", "ibn", "ibo", "ibr", "ibu",
    "iby", "ica", "ich", "icl", "icr", "ida", "idb", "idc", "idd", "ide", "idi", "ido",
    "idr", "ids", "idt", "idu", "ifa", "ifb", "ife", "iff", "ifk", "ifm", "ifu", "ify",
    "igb", "ige", "igg", "igl", "igm", "ign", "igo", "igs", "igw", "ihb", "ihi", "ihp",
    "ihw", "iii", "iin", "ijc", "ije", "ijj", "ijn", "ijs", "ike", "ikh", "iki", "ikk",
    "ikl", "iko", "ikp", "ikr", "iks", "ikt", "iku", "ikv", "ikw", "ikx", "ikz", "ila",
    "ilb", "ile", "ilg", "ili", "ilk", "ill", "ilm", "ilo", "ilp", "ils", "ilu", "ilv",
    "ilw", "ima", "ime", "imi", "iml", "imn", "imo", "imr", "ims", "imt", "imy", "ina",
    "inb", "ind", "ing", "inh", "inj", "inl", "inm", "inn", "ino", "inp", "ins", "int",
    "inz", "ior", "iou", "iow", "ipi", "ipk", "ipo", "iqu", "iqw", "ire", "irh", "iri",
    "irk", "irn", "irr", "iru", "irx", "iry", "isa", "isc", "isd", "ise", "isg", "ish",
    "isi", "isk", "isl", "ism", "isn", "iso", "isr", "ist", "isu", "isv", "ita", "itb",
    "itd", "ite", "iti", "itk", "itl", "itm", "ito", "itr", "its", "itt", "itu", "itv",
    "itw", "itx", "ity", "itz", "ium", "ivb", "ivv", "iwk", "iwm", "iwo", "iws", "ixc",
    "ixi", "ixj", "ixl", "iya", "iyo", "iyx", "izh", "izi", "izm", "izr", "izz", "jaa",
    "jab", "jac", "jad", "jae", "jaf", "jah", "jai", "jaj", "jak", "jal", "jam", "jan",
    "jao", "jap", "jaq", "jar", "jas", "jat", "jau", "jav", "jax", "jay", "jaz", "jbe",
    "jbi", "jbj", "jbk", "jbm", "jbn", "jbo", "jbr", "jbt", "jbu", "jbw", "jcs", "jct",
    "jda", "jdg", "jdt", "jeb", "jee", "jeg", "jeh", "jei", "jek", "jel", "jen", "jer",
    "jet", "jeu", "jgb", "jge", "jgk", "jgo", "jhi", "jhs", "jia", "jib", "jic", "jid",
    "jie", "jig", "jih", "jii", "jil", "jim", "jio", "jiq", "jit", "jiu", "jiv", "jiy",
    "jje", "jjr", "jka", "jkm", "jko", "jkp", "jkr", "jks", "jku", "jle", "jls", "jma",
    "jmb", "jmc", "jmd", "jmi", "jml", "jmn", "jmr", "jms", "jmw", "jmx", "jna", "jnd",
    "jng", "jni", "jnj", "jnl", "jns", "job", "jod", "jog", "jor", "jos", "jow", "jpa",
    "jpn", "jpr", "jqr", "jra", "jrb", "jrr", "jrt", "jru", "jsl", "jua", "jub", "juc",
    "jud", "juh", "jui", "juk", "jul", "jum", "jun", "juo", "jup", "jur", "jus", "jut",
    "juu", "juw", "juy", "jvd", "jvn", "jwi", "jya", "jye", "jyy", "kaa", "kab", "kac",
    "kad", "kae", "kaf", "kag", "kah", "kai", "kaj", "kak", "kal", "kam", "kan", "kao",
    "kap", "kaq", "kas", "kat", "kau", "kav", "kaw", "kax", "kay", "kaz", "kba", "kbb",
    "kbc", "kbd", "kbe", "kbf", "kbg", "kbh", "kbi", "kbj", "kbk", "kbl", "kbm", "kbn",
    "kbo", "kbp", "kbq", "kbr", "kbs", "kbt", "kbu", "kbv", "kbw", "kbx", "kby", "kbz",
    "kca", "kcb", "kcc", "kcd", "kce", "kcf", "kcg", "kch", "kci", "kcj", "kck", "kcl",
    "kcm", "kcn", "kco", "kcp", "kcq", "kcr", "kcs", "kct", "kcu", "kcv", "kcw", "kcx",
    "kcy", "kcz", "kda", "kdc", "kdd", "kde", "kdf", "kdg", "kdh", "kdi", "kdj", "kdk",
    "kdl", "kdm", "kdn", "kdp", "kdq", "kdr", "kds", "kdt", "kdu", "kdv", "kdw", "kdx",
    "kdy", "kdz", "kea", "keb", "kec", "ked", "kee", "kef", "keg", "keh", "kei", "kej",
    "kek", "kel", "kem", "ken", "keo", "kep", "keq", "ker", "kes", "ket", "keu", "kev",
    "kew", "kex", "key", "kez", "kfa", "kfb", "kfc", "kfd", "kfe", "kff", "kfg", "kfh",
    "kfi", "kfj", "kfk", "kfl", "kfm", "kfn", "kfo", "kfp", "kfq", "kfr", "kfs", "kft",
    "kfu", "kfv", "kfw", "kfx", "kfy", "kfz", "kga", "kgb", "kgc", "kgd", "kge", "kgf",
    "kgg", "kgh", "kgi", "kgj", "kgk", "kgl", "kgm", "kgn", "kgo", "kgp", "kgq", "kgr",
    "kgs", "kgt", "kgu", "kgv", "kgw", "kgx", "kgy", "kha", "khb", "khc", "khd", "khe",
    "khf", "khg", "khh", "khj", "khk", "khl", "khm", "khn", "kho", "khp", "khq", "khr",
    "khs", "kht", "khu", "khv", "khw", "khx", "khy", "khz", "kia", "kib", "kic", "kid",
    "kie", "kif", "kig", "kih", "kii", "kij", "kik", "kil", "kim", "kin", "kio", "kip",
    "kiq", "kir", "kis", "kit", "kiu", "kiv", "kiw", "kix", "kiy", "kiz", "kja", "kjb",
    "kjc", "kjd", "kje", "kjf", "kjg", "kjh", "kji", "kjj", "kjk", "kjl", "kjm", "kjn",
    "kjo", "kjp", "kjq", "kjr", "kjs", "kjt", "kju", "kjv", "kjx", "kjy", "kjz", "kka",
    "kkb", "kkc", "kkd", "kke", "kkf", "kkg", "kkh", "kki", "kkj", "kkk", "kkl", "kkm",
    "kkn", "kko", "kkp", "kkq", "kkr", "kks", "kkt", "kku", "kkv", "kkw", "kkx", "kky",
    "kkz", "kla", "klb", "klc", "kld", "kle", "klf", "klg", "klh", "kli", "klj", "klk",
    "kll", "klm", "kln", "klo", "klp", "klq", "klr", "kls", "klt", "klu", "klv", "klw",
    "klx", "kly", "klz", "kma", "kmb", "kmc", "kmd", "kme", "kmf", "kmg", "kmh", "kmi",
    "kmj", "kmk", "kml", "kmm", "kmn", "kmo", "kmp", "kmq", "kmr", "kms", "kmt", "kmu",
    "kmv", "kmw", "kmx", "kmy", "kmz", "kna", "knb", "knc", "knd", "kne", "knf", "kng",
    "knh", "kni", "knj", "knk", "knl", "knm", "knn", "kno", "knp", "knq", "knr", "kns",
    "knt", "knu", "knv", "knw", "knx", "kny", "knz", "koa", "kob", "koc", "kod", "koe",
    "kof", "kog", "koh", "koi", "koj", "kok", "kol", "kom", "kon", "koo", "kop", "koq",
    "kor", "kos", "kot", "kou", "kov", "kow", "kox", "koy", "koz", "kpa", "kpb", "kpc",
    "kpd", "kpe", "kpf", "kpg", "kph", "kpi", "kpj", "kpk", "kpl", "kpm", "kpn", "kpo",
    "kpp", "kpq", "kpr", "kps", "kpt", "kpu", "kpv", "kpw", "kpx", "kpy", "kpz", "kqa",
    "kqb", "kqc", "kqd", "kqe", "kqf", "kqg", "kqh", "kqi", "kqj", "kqk", "kql", "kqm",
    "kqn", "kqo", "kqp", "kqq", "kqr", "kqs", "kqt", "kqu", "kqv", "kqw", "kqx", "kqy",
    "kqz", "kra", "krb", "krc", "krd", "kre", "krf", "krg", "krh", "kri", "krj", "krk",
    "krl", "krm", "krn", "krp", "krq", "krr", "krs", "krt", "kru", "krv", "krw", "krx",
    "kry", "krz", "ksa", "ksb", "ksc", "ksd", "kse", "ksf", "ksg", "ksh", "ksi", "ksj",
    "ksk", "ksl", "ksm", "ksn", "kso", "ksp", "ksq", "ksr", "kss", "kst", "ksu", "ksv",
    "ksw", "ksx", "ksy", "ksz", "kta", "ktb", "ktc", "ktd", "kte", "ktf", "ktg", "kth",
    "kti", "ktj", "ktk", "ktl", "ktm", "ktn", "kto", "ktp", "ktq", "ktr", "kts", "ktt",
    "ktu", "ktv", "ktw", "ktx", "kty", "ktz", "kua", "kub", "kuc", "kud", "kue", "kuf",
    "kug", "kuh", "kui", "kuj", "kuk", "kul", "kum", "kun", "kuo", "kup", "kuq", "kur",
    "kus", "kut", "kuu", "kuv", "kuw", "kux", "kuy", "kuz", "kva", "kvb", "kvc", "kvd",
    "kve", "kvf", "kvg", "kvh", "kvi", "kvj", "kvk", "kvl", "kvm", "kvn", "kvo", "kvp",
    "kvq", "kvr", "kvs", "kvt", "kvu", "kvv", "kvw", "kvx", "kvy", "kvz", "kwa", "kwb",
    "kwc", "kwd", "kwe", "kwf", "kwg", "kwh", "kwi", "kwj", "kwk", "kwl", "kwm", "kwn",
    "kwo", "kwp", "kwq", "kwr", "kws", "kwt", "kwu", "kwv", "kww", "kwx", "kwy", "kwz",
    "kxa", "kxb", "kxc", "kxd", "kxe", "kxf", "kxg", "kxh", "kxi", "kxj", "kxk", "kxl",
    "kxm", "kxn", "kxo", "kxp", "kxq", "kxr", "kxs", "kxt", "kxu", "kxv", "kxw", "kxx",
    "kxy", "kxz", "kya", "kyb", "kyc", "kyd", "kye", "kyf", "kyg", "kyh", "kyi", "kyj",
    "kyk", "kyl", "kym", "kyn", "kyo", "kyp", "kyq", "kyr", "kys", "kyt", "kyu", "kyv",
    "kyw", "kyx", "kyy", "kyz", "kza", "kzb", "kzc", "kzd", "kze", "kzf", "kzg", "kzh",
    "kzi", "kzj", "kzk", "kzl", "kzm", "kzn", "kzo", "kzp", "kzq", "kzr", "kzs", "kzt",
    "kzu", "kzv", "kzw", "kzx", "kzy", "kzz", "laa", "lab", "lac", "lad", "lae", "laf",
    "lag", "lah", "lai", "laj", "lak", "lal", "lam", "lan", "lao", "lap", "laq", "lar",
    "las", "lat", "lau", "lav", "law", "lax", "lay", "laz", "lba", "lbb", "lbc", "lbe",
    "lbf", "lbg", "lbi", "lbj", "lbk", "lbl", "lbm", "lbn", "lbo", "lbq", "lbr", "lbs",
    "lbt", "lbu", "lbv", "lbw", "lbx", "lby", "lbz", "lcc", "lcd", "lce", "lcf", "lch",
    "lcl", "lcm", "lcp", "lcq", "lcs", "lda", "ldb", "ldd", "ldg", "ldh", "ldi", "ldj",
    "ldk", "ldl", "ldm", "ldn", "ldo", "ldp", "ldq", "lea", "leb", "lec", "led", "lee",
    "lef", "leg", "leh", "lei", "lej", "lek", "lel", "lem", "len", "leo", "lep", "leq",
    "ler", "les", "let", "leu", "lev", "lew", "lex", "ley", "lez", "lfa", "lfn", "lga",
    "lgb", "lgg", "lgh", "lgi", "lgk", "lgl", "lgm", "lgn", "lgo", "lgq", "lgr", "lgs",
    "lgt", "lgu", "lgz", "lha", "lhh", "lhi", "lhl", "lhm", "lhn", "lhp", "lhs", "lht",
    "lhu", "lia", "lib", "lic", "lid", "lie", "lif", "lig", "lih", "lii", "lij", "lik",
    "lil", "lim", "lin", "lio", "lip", "liq", "lir", "lis", "lit", "liu", "liv", "liw",
    "lix", "liy", "liz", "lja", "lje", "lji", "ljl", "ljp", "ljw", "ljx", "lka", "lkb",
    "lkc", "lkd", "lke", "lkh", "lki", "lkj", "lkl", "lkm", "lkn", "lko", "lkr", "lks",
    "lkt", "lku", "lky", "lla", "llb", "llc", "lld", "lle", "llf", "llg", "llh", "lli",
    "llj", "llk", "lll", "llm", "lln", "llo", "llp", "llq", "lls", "llu", "llx", "lma",
    "lmb", "lmc", "lmd", "lme", "lmf", "lmg", "lmh", "lmi", "lmj", "lmk", "lml", "lmm",
    "lmn", "lmo", "lmp", "lmq", "lmr", "lms", "lmt", "lmu", "lmv", "lmw", "lmx", "lmy",
    "lmz", "lna", "lnb", "lnc", "lnd", "lng", "lnh", "lni", "lnj", "lnl", "lnm", "lnn",
    "lno", "lns", "lnt", "lnu", "lnw", "lnz", "loa", "lob", "loc", "lod", "loe", "lof",
    "log", "loh", "loi", "loj", "lok", "lol", "lom", "lon", "loo", "lop", "loq", "lor",
    "los", "lot", "lou", "lov", "low", "lox", "loy", "loz", "lpa", "lpe", "lpn", "lpo",
    "lpx", "lqr", "lra", "lrc", "lre", "lrg", "lri", "lrk", "lrl", "lrm", "lrn", "lro",
    "lrr", "lrt", "lrv", "lrz", "lsa", "lsb", "lsc", "lsd", "lse", "lsg", "lsh", "lsi",
    "lsl", "lsm", "lsn", "lso", "lsp", "lsr", "lss", "lst", "lsv", "lsw", "lsy", "ltc",
    "ltg", "lth", "lti", "ltn", "lto", "lts", "ltu", "ltz", "lua", "lub", "luc", "lud",
    "lue", "luf", "lug", "luh", "lui", "luj", "luk", "lul", "lum", "lun", "luo", "lup",
    "luq", "lur", "lus", "lut", "luu", "luv", "luw", "luy", "luz", "lva", "lvi", "lvk",
    "lvl", "lvs", "lvu", "lwa", "lwe", "lwg", "lwh", "lwl", "lwm", "lwo", "lws", "lwt",
    "lwu", "lww", "lxm", "lya", "lyg", "lyn", "lzh", "lzl", "lzn", "lzz", "maa", "mab",
    "mad", "mae", "maf", "mag", "mah", "mai", "maj", "mak", "mal", "mam", "man", "maq",
    "mar", "mas", "mat", "mau", "mav", "maw", "max", "maz", "mba", "mbb", "mbc", "mbd",
    "mbe", "mbf", "mbg", "mbh", "mbi", "mbj", "mbk", "mbl", "mbm", "mbn", "mbo", "mbp",
    "mbq", "mbr", "mbs", "mbt", "mbu", "mbv", "mbw", "mbx", "mby", "mbz", "mca", "mcb",
    "mcc", "mcd", "mce", "mcf", "mcg", "mch", "mci", "mcj", "mck", "mcl", "mcm", "mcn",
    "mco", "mcp", "mcq", "mcr", "mcs", "mct", "mcu", "mcv", "mcw", "mcx", "mcy", "mcz",
    "mda", "mdb", "mdc", "mdd", "mde", "mdf", "mdg", "mdh", "mdi", "mdj", "mdk", "mdl",
    "mdm", "mdn", "mdo", "mdp", "mdq", "mdr", "mds", "mdt", "mdu", "mdv", "mdw", "mdx",
    "mdy", "mdz", "mea", "meb", "mec", "med", "mee", "mef", "meg", "meh", "mei", "mej",
    "mek", "mel", "mem", "men", "meo", "mep", "meq", "mer", "mes", "met", "meu", "mev",
    "mew", "mey", "mez", "mfa", "mfb", "mfc", "mfd", "mfe", "mff", "mfg", "mfh", "mfi",
    "mfj", "mfk", "mfl", "mfm", "mfn", "mfo", "mfp", "mfq", "mfr", "mfs", "mft", "mfu",
    "mfv", "mfw", "mfx", "mfy", "mfz", "mga", "mgb", "mgc", "mgd", "mge", "mgf", "mgg",
    "mgh", "mgi", "mgj", "mgk", "mgl", "mgm", "mgn", "mgo", "mgp", "mgq", "mgr", "mgs",
    "mgt", "mgu", "mgv", "mgw", "mgx", "mgy", "mgz", "mha", "mhb", "mhc", "mhd", "mhe",
    "mhf", "mhg", "mhh", "mhi", "mhj", "mhk", "mhl", "mhm", "mhn", "mho", "mhp", "mhq",
    "mhr", "mhs", "mht", "mhu", "mhv", "mhw", "mhx", "mhy", "mhz", "mia", "mib", "mic",
    "mid", "mie", "mif", "mig", "mih", "mii", "mij", "mik", "mil", "mim", "min", "mio",
    "mip", "miq", "mir", "mis", "mit", "miu", "miv", "miw", "mix", "miy", "miz", "mja",
    "mjb", "mjc", "mjd", "mje", "mjg", "mjh", "mji", "mjj", "mjk", "mjl", "mjm", "mjn",
    "mjo", "mjp", "mjq", "mjr", "mjs", "mjt", "mju", "mjv", "mjw", "mjx", "mjy", "mjz",
    "mka", "mkb", "mkc", "mkd", "mke", "mkf", "mkg", "mki", "mkj", "mkk", "mkl", "mkm",
    "mkn", "mko", "mkp", "mkq", "mkr", "mks", "mkt", "mku", "mkv", "mkw", "mkx", "mky",
    "mkz", "mla", "mlb", "mlc", "mld", "mle", "mlf", "mlg", "mlh", "mli", "mlj", "mlk",
    "mll", "mlm", "mln", "mlo", "mlp", "mlq", "mlr", "mls", "mlt", "mlu", "mlv", "mlw",
    "mlx", "mly", "mlz", "mma", "mmb", "mmc", "mmd", "mme", "mmf", "mmg", "mmh", "mmi",
    "mmj", "mmk", "mml", "mmm", "mmn", "mmo", "mmp", "mmq", "mmr", "mms", "mmt", "mmu",
    "mmv", "mmw", "mmx", "mmy", "mmz", "mna", "mnb", "mnc", "mnd", "mne", "mnf", "mng",
    "mnh", "mni", "mnj", "mnk", "mnl", "mnm", "mnn", "mnp", "mnq", "mnr", "mns", "mnt",
    "mnu", "mnv", "mnw", "mnx", "mny", "mnz", "moa", "mob", "moc", "mod", "moe", "mof",
    "mog", "moh", "moi", "moj", "mok", "mol", "mom", "mon", "moo", "mop", "moq", "mor",
    "mos", "mot", "mou", "mov", "mow", "mox", "moy", "moz", "mpa", "mpb", "mpc", "mpd",
    "mpe", "mpf", "mpg", "mph", "mpi", "mpj", "mpk", "mpl", "mpm", "mpn", "mpo", "mpp",
    "mpq", "mpr", "mps", "mpt", "mpu", "mpv", "mpw", "mpx", "mpy", "mpz", "mqa", "mqb",
    "mqc", "mqd", "mqe", "mqf", "mqg", "mqh", "mqi", "mqj", "mqk", "mql", "mqm", "mqn",
    "mqo", "mqp", "mqq", "mqr", "mqs", "mqt", "mqu", "mqv", "mqw", "mqx", "mqy", "mqz",
    "mra", "mrb", "mrc", "mrd", "mre", "mrf", "mrg", "mrh", "mri", "mrj", "mrk", "mrl",
    "mrm", "mrn", "mro", "mrp", "mrq", "mrr", "mrs", "mrt", "mru", "mrv", "mrw", "mrx",
    "mry", "mrz", "msa", "msb", "msc", "msd", "mse", "msf", "msg", "msh", "msi", "msj",
    "msk", "msl", "msm", "msn", "mso", "msp", "msq", "msr", "mss", "mst", "msu", "msv",
    "msw", "msx", "msy", "msz", "mta", "mtb", "mtc", "mtd", "mte", "mtf", "mtg", "mth",
    "mti", "mtj", "mtk", "mtl", "mtm", "mtn", "mto", "mtp", "mtq", "mtr", "mts", "mtt",
    "mtu", "mtv", "mtw", "mtx", "mty", "mtz", "mua", "mub", "muc", "mud", "mue", "mug",
    "muh", "mui", "muj", "muk", "mul", "mum", "muo", "mup", "muq", "mur", "mus", "mut",
    "muu", "muv", "muw", "mux", "muy", "muz", "mva", "mvb", "mvc", "mvd", "mve", "mvf",
    "mvg", "mvh", "mvi", "mvj", "mvk", "mvl", "mvm", "mvn", "mvo", "mvp", "mvq", "mvr",
    "mvs", "mvt", "mvu", "mvv", "mvw", "mvx", "mvy", "mvz", "mwa", "mwb", "mwc", "mwd",
    "mwe", "mwf", "mwg", "mwh", "mwi", "mwj", "mwk", "mwl", "mwm", "mwn", "mwo", "mwp",
    "mwq", "mwr", "mws", "mwt", "mwu", "mwv", "mww", "mwx", "mwy", "mwz", "mxa", "mxb",
    "mxc", "mxd", "mxe", "mxf", "mxg", "mxh", "mxi", "mxj", "mxk", "mxl", "mxm", "mxn",
    "mxo", "mxp", "mxq", "mxr", "mxs", "mxt", "mxu", "mxv", "mxw", "mxx", "mxy", "mxz",
    "mya", "myb", "myc", "myd", "mye", "myf", "myg", "myh", "myi", "myj", "myk", "myl",
    "mym", "myo", "myp", "myq", "myr", "mys", "myt", "myu", "myv", "myw", "myx", "myy",
    "myz", "mza", "mzb", "mzc", "mzd", "mze", "mzf", "mzg", "mzh", "mzi", "mzj", "mzk",
    "mzl", "mzm", "mzn", "mzo", "mzp", "mzq", "mzr", "mzs", "mzt", "mzu", "mzv", "mzw",
    "mzx", "mzy", "mzz", "naa", "nab", "nac", "nad", "nae", "naf", "nag", "naj", "nak",
    "nal", "nam", "nan", "nao", "nap", "naq", "nar", "nas", "nat", "nau", "nav", "naw",
    "nax", "nay", "naz", "nba", "nbb", "nbc", "nbd", "nbe", "nbf", "nbg", "nbh", "nbi",
    "nbj", "nbk", "nbl", "nbm", "nbn", "nbo", "nbp", "nbq", "nbr", "nbs", "nbt", "nbu",
    "nbv", "nbw", "nbx", "nby", "nca", "ncb", "ncc", "ncd", "nce", "ncf", "ncg", "nch",
    "nci", "ncj", "nck", "ncl", "ncm", "ncn", "nco", "ncp", "ncq", "ncr", "ncs", "nct",
    "ncu", "ncx", "ncz", "nda", "ndb", "ndc", "ndd", "nde", "ndf", "ndg", "ndh", "ndi",
    "ndj", "ndk", "ndl", "ndm", "ndn", "ndo", "ndp", "ndq", "ndr", "nds", "ndt", "ndu",
    "ndv", "ndw", "ndx", "ndy", "ndz", "nea", "neb", "nec", "ned", "nee", "nef", "neg",
    "neh", "nei", "nej", "nek", "nem", "nen", "neo", "nep", "neq", "ner", "nes", "net",
    "neu", "nev", "new", "nex", "ney", "nez", "nfa", "nfd", "nfg", "nfk", "nfl", "nfr",
    "nfu", "nga", "ngb", "ngc", "ngd", "nge", "ngg", "ngh", "ngi", "ngj", "ngk", "ngl",
    "ngm", "ngn", "ngo", "ngp", "ngq", "ngr", "ngs", "ngt", "ngu", "ngv", "ngw", "ngx",
    "ngy", "ngz", "nha", "nhb", "nhc", "nhd", "nhe", "nhf", "nhg", "nhh", "nhi", "nhj",
    "nhk", "nhm", "nhn", "nho", "nhp", "nhq", "nhr", "nhs", "nht", "nhu", "nhv", "nhw",
    "nhx", "nhy", "nhz", "nia", "nib", "nid", "nie", "nif", "nig", "nih", "nii", "nij",
    "nik", "nil", "nim", "nin", "nio", "niq", "nir", "nis", "nit", "niu", "niv", "niw",
    "nix", "niy", "niz", "nja", "njb", "njd", "njh", "nji", "njj", "njl", "njm", "njn",
    "njo", "njr", "njs", "njt", "nju", "njx", "njy", "njz", "nka", "nkb", "nkc", "nkd",
    "nke", "nkf", "nkg", "nkh", "nki", "nkj", "nkk", "nkm", "nkn", "nko", "nkp", "nkq",
    "nkr", "nks", "nkt", "nku", "nkv", "nkw", "nkx", "nky", "nkz", "nla", "nlc", "nld",
    "nle", "nlg", "nli", "nlj", "nlk", "nll", "nlm", "nln", "nlo", "nlq", "nlr", "nlu",
    "nlv", "nlw", "nlx", "nly", "nlz", "nma", "nmb", "nmc", "nmd", "nme", "nmf", "nmg",
    "nmh", "nmi", "nmj", "nmk", "nml", "nmm", "nmn", "nmo", "nmp", "nmq", "nmr", "nms",
    "nmt", "nmu", "nmv", "nmw", "nmx", "nmy", "nmz", "nna", "nnb", "nnc", "nnd", "nne",
    "nnf", "nng", "nnh", "nni", "nnj", "nnk", "nnl", "nnm", "nnn", "nno", "nnp", "nnq",
    "nnr", "nns", "nnt", "nnu", "nnv", "nnw", "nnx", "nny", "nnz", "noa", "nob", "noc",
    "nod", "noe", "nof", "nog", "noh", "noi", "noj", "nok", "nol", "nom", "non", "noo",
    "nop", "noq", "nor", "nos", "not", "nou", "nov", "now", "noy", "noz", "npa", "npb",
    "npg", "nph", "npi", "npl", "npn", "npo", "nps", "npu", "npx", "npy", "nqg", "nqk",
    "nql", "nqm", "nqn", "nqo", "nqq", "nqt", "nqy", "nra", "nrb", "nrc", "nre", "nrf",
    "nrg", "nri", "nrk", "nrl", "nrm", "nrn", "nrp", "nrr", "nrt", "nru", "nrx", "nrz",
    "nsa", "nsb", "nsc", "nsd", "nse", "nsf", "nsg", "nsh", "nsi", "nsk", "nsl", "nsm",
    "nsn", "nso", "nsp", "nsq", "nsr", "nss", "nst", "nsu", "nsv", "nsw", "nsx", "nsy",
    "nsz", "ntd", "nte", "ntg", "nti", "ntj", "ntk", "ntm", "nto", "ntp", "ntr", "nts",
    "ntu", "ntw", "ntx", "nty", "ntz", "nua", "nuc", "nud", "nue", "nuf", "nug", "nuh",
    "nui", "nuj", "nuk", "nul", "num", "nun", "nuo", "nup", "nuq", "nur", "nus", "nut",
    "nuu", "nuv", "nuw", "nux", "nuy", "nuz", "nvh", "nvm", "nvo", "nwa", "nwb", "nwc",
    "nwe", "nwg", "nwi", "nwm", "nwo", "nwr", "nww", "nwx", "nwy", "nxa", "nxd", "nxe",
    "nxg", "nxi", "nxj", "nxk", "nxl", "nxm", "nxn", "nxo", "nxq", "nxr", "nxu", "nxx",
    "nya", "nyb", "nyc", "nyd", "nye", "nyf", "nyg", "nyh", "nyi", "nyj", "nyk", "nyl",
    "nym", "nyn", "nyo", "nyp", "nyq", "nyr", "nys", "nyt", "nyu", "nyv", "nyw", "nyx",
    "nyy", "nza", "nzb", "nzd", "nzi", "nzk", "nzm", "nzr", "nzs", "nzu", "nzy", "nzz",
    "oaa", "oac", "oar", "oav", "obi", "obk", "obl", "obm", "obo", "obr", "obt", "obu",
    "oca", "occ", "och", "oci", "ocm", "oco", "ocu", "oda", "odk", "odt", "odu", "ofo",
    "ofs", "ofu", "ogb", "ogc", "oge", "ogg", "ogn", "ogo", "ogu", "oht", "ohu", "oia",
    "oie", "oin", "ojb", "ojc", "ojg", "oji", "ojp", "ojs", "ojv", "ojw", "oka", "okb",
    "okc", "okd", "oke", "okg", "okh", "oki", "okj", "okk", "okl", "okm", "okn", "oko",
    "okr", "oks", "oku", "okv", "okx", "okz", "ola", "old", "ole", "olk", "olm", "olo",
    "olr", "olt", "olu", "oma", "omb", "omc", "ome", "omg", "omi", "omk", "oml", "omn",
    "omo", "omp", "omr", "omt", "omu", "omw", "omx", "omy", "ona", "onb", "one", "ong",
    "oni", "onj", "onk", "onn", "ono", "onp", "onr", "ons", "ont", "onu", "onw", "onx",
    "ood", "oog", "oon", "oor", "oos", "opa", "ope", "opk", "opm", "opo", "opt", "opy",
    "ora", "orc", "ore", "org", "orh", "ori", "ork", "orm", "orn", "oro", "orr", "ors",
    "ort", "oru", "orv", "orw", "orx", "ory", "orz", "osa", "osc", "osi", "osn", "oso",
    "osp", "oss", "ost", "osu", "osx", "ota", "otb", "otd", "ote", "oti", "otk", "otl",
    "otm", "otn", "otq", "otr", "ots", "ott", "otu", "otw", "otx", "oty", "otz", "oua",
    "oub", "oue", "oui", "oum", "oun", "ovd", "owi", "owl", "oyb", "oyd", "oym", "oyy",
    "ozm", "pab", "pac", "pad", "pae", "paf", "pag", "pah", "pai", "paj", "pak", "pal",
    "pam", "pan", "pao", "pap", "paq", "par", "pas", "pat", "pau", "pav", "paw", "pax",
    "pay", "paz", "pbb", "pbc", "pbe", "pbf", "pbg", "pbh", "pbi", "pbl", "pbm", "pbn",
    "pbo", "pbp", "pbr", "pbs", "pbt", "pbu", "pbv", "pby", "pbz", "pca", "pcb", "pcc",
    "pcd", "pce", "pcf", "pcg", "pch", "pci", "pcj", "pck", "pcl", "pcm", "pcn", "pcp",
    "pcr", "pcw", "pda", "pdc", "pdi", "pdn", "pdo", "pdt", "pdu", "pea", "peb", "pec",
    "ped", "pee", "pef", "peg", "peh", "pei", "pej", "pek", "pel", "pem", "pen", "peo",
    "pep", "peq", "pes", "pev", "pex", "pey", "pez", "pfa", "pfe", "pfl", "pga", "pgd",
    "pgg", "pgi", "pgk", "pgl", "pgn", "pgs", "pgu", "pgy", "pgz", "pha", "phd", "phg",
    "phh", "phj", "phk", "phl", "phm", "phn", "pho", "phq", "phr", "pht", "phu", "phv",
    "phw", "pia", "pib", "pic", "pid", "pie", "pif", "pig", "pih", "pii", "pij", "pil",
    "pim", "pin", "pio", "pip", "pir", "pis", "pit", "piu", "piv", "piw", "pix", "piy",
    "piz", "pjt", "pka", "pkb", "pkc", "pkg", "pkh", "pkn", "pko", "pkp", "pkr", "pks",
    "pkt", "pku", "pla", "plb", "plc", "pld", "ple", "plg", "plh", "pli", "plj", "plk",
    "pll", "plm", "pln", "plo", "plp", "plq", "plr", "pls", "plt", "plu", "plv", "plw",
    "ply", "plz", "pma", "pmb", "pmc", "pmd", "pme", "pmf", "pmh", "pmi", "pmj", "pmk",
    "pml", "pmm", "pmn", "pmo", "pmq", "pmr", "pms", "pmt", "pmu", "pmw", "pmx", "pmy",
    "pmz", "pna", "pnb", "pnc", "pnd", "pne", "png", "pnh", "pni", "pnj", "pnk", "pnl",
    "pnm", "pnn", "pno", "pnp", "pnq", "pnr", "pns", "pnt", "pnu", "pnv", "pnw", "pnx",
    "pny", "pnz", "poa", "pob", "poc", "pod", "poe", "pof", "pog", "poh", "poi", "poj",
    "pok", "pol", "pom", "pon", "poo", "pop", "poq", "por", "pos", "pot", "pou", "pov",
    "pow", "pox", "poy", "ppa", "ppe", "ppi", "ppk", "ppl", "ppm", "ppn", "ppo", "ppp",
    "ppq", "ppr", "pps", "ppt", "ppu", "ppv", "pqa", "pqm", "prb", "prc", "prd", "pre",
    "prf", "prg", "prh", "pri", "prk", "prl", "prm", "prn", "pro", "prp", "prq", "prr",
    "prs", "prt", "pru", "prv", "prw", "prx", "pry", "prz", "psa", "psc", "psd", "pse",
    "psg", "psh", "psi", "psl", "psm", "psn", "pso", "psp", "psq", "psr", "pss", "pst",
    "psu", "psw", "psy", "pta", "pth", "pti", "ptn", "pto", "ptp", "ptq", "ptr", "ptt",
    "ptu", "ptv", "ptw", "pty", "pua", "pub", "puc", "pud", "pue", "puf", "pug", "pui",
    "puj", "puk", "pum", "pun", "puo", "pup", "puq", "pur", "pus", "put", "puu", "puw",
    "pux", "puy", "puz", "pwa", "pwb", "pwg", "pwi", "pwm", "pwn", "pwo", "pwr", "pww",
    "pxm", "pye", "pym", "pyn", "pys", "pyu", "pyx", "pyy", "pze", "pzh", "pzn", "qua",
    "qub", "quc", "qud", "que", "quf", "qug", "quh", "qui", "quj", "quk", "qul", "qum",
    "qun", "qup", "quq", "qur", "qus", "qut", "quu", "quv", "quw", "qux", "quy", "quz",
    "qva", "qvc", "qve", "qvh", "qvi", "qvj", "qvl", "qvm", "qvn", "qvo", "qvp", "qvs",
    "qvw", "qvy", "qvz", "qwa", "qwc", "qwh", "qwm", "qws", "qwt", "qxa", "qxc", "qxh",
    "qxi", "qxl", "qxn", "qxo", "qxp", "qxq", "qxr", "qxs", "qxt", "qxu", "qxw", "qya",
    "qyp", "raa", "rab", "rac", "rad", "rae", "raf", "rag", "rah", "rai", "raj", "rak",
    "ral", "ram", "ran", "rao", "rap", "raq", "rar", "ras", "rat", "rau", "rav", "raw",
    "rax", "ray", "raz", "rbb", "rbk", "rbl", "rbp", "rcf", "rdb", "rea", "reb", "ree",
    "reg", "rei", "rej", "rel", "rem", "ren", "rer", "res", "ret", "rey", "rga", "rge",
    "rgk", "rgn", "rgr", "rgs", "rgu", "rhg", "rhp", "ria", "rib", "rie", "rif", "ril",
    "rim", "rin", "rir", "rit", "riu", "rjb", "rjg", "rji", "rjs", "rka", "rkb", "rkh",
    "rki", "rkm", "rkt", "rkw", "rma", "rmb", "rmc", "rmd", "rme", "rmf", "rmg", "rmh",
    "rmi", "rmk", "rml", "rmm", "rmn", "rmo", "rmp", "rmq", "rmr", "rms", "rmt", "rmu",
    "rmv", "rmw", "rmx", "rmy", "rmz", "rna", "rnb", "rnd", "rng", "rnl", "rnn", "rnp",
    "rnr", "rnw", "rob", "roc", "rod", "roe", "rof", "rog", "roh", "rol", "rom", "ron",
    "roo", "rop", "ror", "rou", "row", "rpn", "rpt", "rri", "rrm", "rro", "rrt", "rsb",
    "rsi", "rsk", "rsl", "rsm", "rsn", "rsw", "rtc", "rth", "rtm", "rts", "rtw", "rub",
    "ruc", "rue", "ruf", "rug", "ruh", "rui", "ruk", "run", "ruo", "rup", "ruq", "rus",
    "rut", "ruu", "ruy", "ruz", "rwa", "rwk", "rwl", "rwm", "rwo", "rwr", "rws", "rxd",
    "rxw", "ryn", "rys", "ryu", "rzh", "saa", "sab", "sac", "sad", "sae", "saf", "sag",
    "sah", "saj", "sak", "sam", "san", "sao", "sap", "saq", "sar", "sas", "sat", "sau",
    "sav", "saw", "sax", "say", "saz", "sba", "sbb", "sbc", "sbd", "sbe", "sbf", "sbg",
    "sbh", "sbi", "sbj", "sbk", "sbl", "sbm", "sbn", "sbo", "sbp", "sbq", "sbr", "sbs",
    "sbt", "sbu", "sbv", "sbw", "sbx", "sby", "sbz", "sca", "scb", "scc", "sce", "scf",
    "scg", "sch", "sci", "sck", "scl", "scn", "sco", "scp", "scq", "scr", "scs", "sct",
    "scu", "scv", "scw", "scx", "sda", "sdb", "sdc", "sdd", "sde", "sdf", "sdg", "sdh",
    "sdi", "sdj", "sdk", "sdl", "sdm", "sdn", "sdo", "sdp", "sdq", "sdr", "sds", "sdt",
    "sdu", "sdx", "sdz", "sea", "seb", "sec", "sed", "see", "sef", "seg", "seh", "sei",
    "sej", "sek", "sel", "sen", "seo", "sep", "seq", "ser", "ses", "set", "seu", "sev",
    "sew", "sey", "sez", "sfb", "sfe", "sfm", "sfs", "sfw", "sga", "sgb", "sgc", "sgd",
    "sge", "sgg", "sgh", "sgi", "sgj", "sgk", "sgl", "sgm", "sgo", "sgp", "sgr", "sgs",
    "sgt", "sgu", "sgw", "sgx", "sgy", "sgz", "sha", "shb", "shc", "shd", "she", "shg",
    "shh", "shi", "shj", "shk", "shl", "shm", "shn", "sho", "shp", "shq", "shr", "shs",
    "sht", "shu", "shv", "shw", "shx", "shy", "shz", "sia", "sib", "sic", "sid", "sie",
    "sif", "sig", "sih", "sii", "sij", "sik", "sil", "sim", "sin", "sip", "siq", "sir",
    "sis", "siu", "siv", "siw", "six", "siy", "siz", "sja", "sjb", "sjc", "sjd", "sje",
    "sjg", "sjk", "sjl", "sjm", "sjn", "sjo", "sjp", "sjr", "sjs", "sjt", "sju", "sjw",
    "ska", "skb", "skc", "skd", "ske", "skf", "skg", "skh", "ski", "skj", "skk", "skl",
    "skm", "skn", "sko", "skp", "skq", "skr", "sks", "skt", "sku", "skv", "skw", "skx",
    "sky", "skz", "slb", "slc", "sld", "sle", "slf", "slg", "slh", "sli", "slj", "slk",
    "sll", "slm", "sln", "slp", "slq", "slr", "sls", "slt", "slu", "slv", "slw", "slx",
    "sly", "slz", "sma", "smb", "smc", "smd", "sme", "smf", "smg", "smh", "smj", "smk",
    "sml", "smm", "smn", "smo", "smp", "smq", "smr", "sms", "smt", "smu", "smv", "smw",
    "smx", "smy", "smz", "sna", "snb", "snc", "snd", "sne", "snf", "sng", "snh", "sni",
    "snj", "snk", "snl", "snm", "snn", "sno", "snp", "snq", "snr", "sns", "snu", "snv",
    "snw", "snx", "sny", "snz", "soa", "sob", "soc", "sod", "soe", "sog", "soh", "soi",
    "soj", "sok", "sol", "som", "soo", "sop", "soq", "sor", "sos", "sot", "sou", "sov",
    "sow", "sox", "soy", "soz", "spa", "spb", "spc", "spd", "spe", "spg", "spi", "spk",
    "spl", "spm", "spn", "spo", "spp", "spq", "spr", "sps", "spt", "spu", "spv", "spx",
    "spy", "sqa", "sqh", "sqi", "sqk", "sqm", "sqn", "sqo", "sqq", "sqr", "sqs", "sqt",
    "squ", "sqx", "sra", "srb", "src", "srd", "sre", "srf", "srg", "srh", "sri", "srj",
    "srk", "srl", "srm", "srn", "sro", "srp", "srq", "srr", "srs", "srt", "sru", "srv",
    "srw", "srx", "sry", "srz", "ssb", "ssc", "ssd", "sse", "ssf", "ssg", "ssh", "ssi",
    "ssj", "ssk", "ssl", "ssm", "ssn", "sso", "ssp", "ssq", "ssr", "sss", "sst", "ssu",
    "ssv", "ssw", "ssx", "ssy", "ssz", "sta", "stb", "stc", "std", "ste", "stf", "stg",
    "sth", "sti", "stj", "stk", "stl", "stm", "stn", "sto", "stp", "stq", "str", "sts",
    "stt", "stu", "stv", "stw", "sty", "sua", "sub", "suc", "sue", "suf", "sug", "suh",
    "sui", "suj", "suk", "sul", "sum", "sun", "suo", "suq", "sur", "sus", "sut", "suu",
    "suv", "suw", "sux", "suy", "suz", "sva", "svb", "svc", "sve", "svk", "svm", "svr",
    "svs", "svx", "swa", "swb", "swc", "swe", "swf", "swg", "swh", "swi", "swj", "swk",
    "swl", "swm", "swn", "swo", "swp", "swq", "swr", "sws", "swt", "swu", "swv", "sww",
    "swx", "swy", "sxb", "sxc", "sxe", "sxg", "sxk", "sxl", "sxm", "sxn", "sxo", "sxr",
    "sxs", "sxu", "sxw", "sya", "syb", "syc", "syi", "syk", "syl", "sym", "syn", "syo",
    "syr", "sys", "syw", "syx", "syy", "sza", "szb", "szc", "szd", "sze", "szg", "szk",
    "szl", "szn", "szp", "szs", "szv", "szw", "szy", "taa", "tab", "tac", "tad", "tae",
    "taf", "tag", "tah", "taj", "tak", "tal", "tam", "tan", "tao", "tap", "taq", "tar",
    "tas", "tat", "tau", "tav", "taw", "tax", "tay", "taz", "tba", "tbb", "tbc", "tbd",
    "tbe", "tbf", "tbg", "tbh", "tbi", "tbj", "tbk", "tbl", "tbm", "tbn", "tbo", "tbp",
    "tbr", "tbs", "tbt", "tbu", "tbv", "tbw", "tbx", "tby", "tbz", "tca", "tcb", "tcc",
    "tcd", "tce", "tcf", "tcg", "tch", "tci", "tck", "tcl", "tcm", "tcn", "tco", "tcp",
    "tcq", "tcs", "tct", "tcu", "tcw", "tcx", "tcy", "tcz", "tda", "tdb", "tdc", "tdd",
    "tde", "tdf", "tdg", "tdh", "tdi", "tdj", "tdk", "tdl", "tdm", "tdn", "tdo", "tdq",
    "tdr", "tds", "tdt", "tdu", "tdv", "tdx", "tdy", "tea", "teb", "tec", "ted", "tee",
    "tef", "teg", "teh", "tei", "tek", "tel", "tem", "ten", "teo", "tep", "teq", "ter",
    "tes", "tet", "teu", "tev", "tew", "tex", "tey", "tez", "tfi", "tfn", "tfo", "tfr",
    "tft", "tga", "tgb", "tgc", "tgd", "tge", "tgf", "tgg", "tgh", "tgi", "tgj", "tgk",
    "tgl", "tgn", "tgo", "tgp", "tgq", "tgr", "tgs", "tgt", "tgu", "tgv", "tgw", "tgx",
    "tgy", "tgz", "tha", "thc", "thd", "the", "thf", "thh", "thi", "thk", "thl", "thm",
    "thn", "thp", "thq", "thr", "ths", "tht", "thu", "thv", "thw", "thx", "thy", "thz",
    "tia", "tic", "tid", "tie", "tif", "tig", "tih", "tii", "tij", "tik", "til", "tim",
    "tin", "tio", "tip", "tiq", "tir", "tis", "tit", "tiu", "tiv", "tiw", "tix", "tiy",
    "tiz", "tja", "tjg", "tji", "tjj", "tjl", "tjm", "tjn", "tjo", "tjp", "tjs", "tju",
    "tjw", "tka", "tkb", "tkd", "tke", "tkf", "tkg", "tkk", "tkl", "tkm", "tkn", "tkp",
    "tkq", "tkr", "tks", "tkt", "tku", "tkv", "tkw", "tkx", "tkz", "tla", "tlb", "tlc",
    "tld", "tle", "tlf", "tlg", "tlh", "tli", "tlj", "tlk", "tll", "tlm", "tln", "tlo",
    "tlp", "tlq", "tlr", "tls", "tlt", "tlu", "tlv", "tlw", "tlx", "tly", "tlz", "tma",
    "tmb", "tmc", "tmd", "tme", "tmf", "tmg", "tmh", "tmi", "tmj", "tmk", "tml", "tmm",
    "tmn", "tmo", "tmp", "tmq", "tmr", "tms", "tmt", "tmu", "tmv", "tmw", "tmx", "tmy",
    "tmz", "tna", "tnb", "tnc", "tnd", "tne", "tnf", "tng", "tnh", "tni", "tnj", "tnk",
    "tnl", "tnm", "tnn", "tno", "tnp", "tnq", "tnr", "tns", "tnt", "tnu", "tnv", "tnw",
    "tnx", "tny", "tnz", "tob", "toc", "tod", "toe", "tof", "tog", "toh", "toi", "toj",
    "tok", "tol", "tom", "ton", "too", "top", "toq", "tor", "tos", "tot", "tou", "tov",
    "tow", "tox", "toy", "toz", "tpa", "tpc", "tpe", "tpf", "tpg", "tpi", "tpj", "tpk",
    "tpl", "tpm", "tpn", "tpo", "tpp", "tpq", "tpr", "tpt", "tpu", "tpv", "tpw", "tpx",
    "tpy", "tpz", "tqb", "tql", "tqm", "tqn", "tqo", "tqp", "tqq", "tqr", "tqt", "tqu",
    "tqw", "tra", "trb", "trc", "trd", "tre", "trf", "trg", "trh", "tri", "trj", "trl",
    "trm", "trn", "tro", "trp", "trq", "trr", "trs", "trt", "tru", "trv", "trw", "trx",
    "try", "trz", "tsa", "tsb", "tsc", "tsd", "tse", "tsf", "tsg", "tsh", "tsi", "tsj",
    "tsk", "tsl", "tsm", "tsn", "tso", "tsp", "tsq", "tsr", "tss", "tst", "tsu", "tsv",
    "tsw", "tsx", "tsy", "tsz", "tta", "ttb", "ttc", "ttd", "tte", "ttf", "ttg", "tth",
    "tti", "ttj", "ttk", "ttl", "ttm", "ttn", "tto", "ttp", "ttq", "ttr", "tts", "ttt",
    "ttu", "ttv", "ttw", "ttx", "tty", "ttz", "tua", "tub", "tuc", "tud", "tue", "tuf",
    "tug", "tuh", "tui", "tuj", "tuk", "tul", "tum", "tun", "tuo", "tuq", "tur", "tus",
    "tuu", "tuv", "tux", "tuy", "tuz", "tva", "tvd", "tve", "tvi", "tvk", "tvl", "tvm",
    "tvn", "tvo", "tvs", "tvt", "tvu", "tvw", "tvx", "tvy", "twa", "twb", "twc", "twd",
    "twe", "twf", "twg", "twh", "twi", "twl", "twm", "twn", "two", "twp", "twq", "twr",
    "twt", "twu", "tww", "twx", "twy", "txa", "txb", "txc", "txe", "txg", "txh", "txi",
    "txj", "txm", "txn", "txo", "txq", "txr", "txs", "txt", "txu", "txx", "txy", "tya",
    "tye", "tyh", "tyi", "tyj", "tyl", "tyn", "typ", "tyr", "tys", "tyt", "tyu", "tyv",
    "tyx", "tyy", "tyz", "tza", "tzb", "tzc", "tze", "tzh", "tzj", "tzl", "tzm", "tzn",
    "tzo", "tzs", "tzt", "tzu", "tzx", "tzz", "uam", "uan", "uar", "uba", "ubi", "ubl",
    "ubm", "ubr", "ubu", "uby", "uda", "ude", "udg", "udi", "udj", "udl", "udm", "udu",
    "ues", "ufi", "uga", "ugb", "uge", "ugh", "ugn", "ugo", "ugy", "uha", "uhn", "uig",
    "uis", "uiv", "uji", "uka", "ukg", "ukh", "uki", "ukk", "ukl", "ukp", "ukq", "ukr",
    "uks", "uku", "ukv", "ukw", "uky", "ula", "ulb", "ulc", "ule", "ulf", "uli", "ulk",
    "ull", "ulm", "uln", "ulu", "ulw", "uly", "uma", "umb", "umc", "umd", "umg", "umi",
    "umm", "umn", "umo", "ump", "umr", "ums", "umu", "una", "und", "une", "ung", "uni",
    "unk", "unm", "unn", "unp", "unr", "unu", "unx", "unz", "uok", "uon", "upi", "upv",
    "ura", "urb", "urc", "urd", "ure", "urf", "urg", "urh", "uri", "urk", "url", "urm",
    "urn", "uro", "urp", "urr", "urt", "uru", "urv", "urw", "urx", "ury", "urz", "usa",
    "ush", "usi", "usk", "usp", "uss", "usu", "uta", "ute", "uth", "utp", "utr", "utu",
    "uum", "uun", "uur", "uuu", "uve", "uvh", "uvl", "uwa", "uya", "uzb", "uzn", "uzs",
    "vaa", "vae", "vaf", "vag", "vah", "vai", "vaj", "val", "vam", "van", "vao", "vap",
    "var", "vas", "vau", "vav", "vay", "vbb", "vbk", "vec", "ved", "vel", "vem", "ven",
    "veo", "vep", "ver", "vgr", "vgt", "vic", "vid", "vie", "vif", "vig", "vil", "vin",
    "vis", "vit", "viv", "vjk", "vka", "vki", "vkj", "vkk", "vkl", "vkm", "vkn", "vko",
    "vkp", "vkt", "vku", "vky", "vkz", "vlp", "vlr", "vls", "vma", "vmb", "vmc", "vmd",
    "vme", "vmf", "vmg", "vmh", "vmi", "vmj", "vmk", "vml", "vmm", "vmo", "vmp", "vmq",
    "vmr", "vms", "vmu", "vmv", "vmw", "vmx", "vmy", "vmz", "vnk", "vnm", "vnp", "vol",
    "vor", "vot", "vra", "vro", "vrs", "vrt", "vsi", "vsl", "vsn", "vsv", "vto", "vum",
    "vun", "vut", "vwa", "waa", "wab", "wac", "wad", "wae", "waf", "wag", "wah", "wai",
    "waj", "wal", "wam", "wan", "wao", "wap", "waq", "war", "was", "wat", "wau", "wav",
    "waw", "wax", "way", "waz", "wba", "wbb", "wbe", "wbf", "wbh", "wbi", "wbj", "wbk",
    "wbl", "wbm", "wbp", "wbq", "wbr", "wbs", "wbt", "wbv", "wbw", "wca", "wci", "wdd",
    "wdg", "wdj", "wdk", "wdt", "wdu", "wdy", "wea", "wec", "wed", "weg", "weh", "wei",
    "wem", "weo", "wep", "wer", "wes", "wet", "weu", "wew", "wfg", "wga", "wgb", "wgg",
    "wgi", "wgo", "wgu", "wgw", "wgy", "wha", "whg", "whk", "whu", "wib", "wic", "wie",
    "wif", "wig", "wih", "wii", "wij", "wik", "wil", "wim", "win", "wir", "wit", "wiu",
    "wiv", "wiw", "wiy", "wja", "wji", "wka", "wkb", "wkd", "wkl", "wkr", "wku", "wkw",
    "wky", "wla", "wlc", "wle", "wlg", "wlh", "wli", "wlk", "wll", "wlm", "wln", "wlo",
    "wlr", "wls", "wlu", "wlv", "wlw", "wlx", "wly", "wma", "wmb", "wmc", "wmd", "wme",
    "wmg", "wmh", "wmi", "wmm", "wmn", "wmo", "wms", "wmt", "wmw", "wmx", "wnb", "wnc",
    "wnd", "wne", "wng", "wni", "wnk", "wnm", "wnn", "wno", "wnp", "wnu", "wnw", "wny",
    "woa", "wob", "woc", "wod", "woe", "wof", "wog", "woi", "wok", "wol", "wom", "won",
    "woo", "wor", "wos", "wow", "woy", "wpc", "wra", "wrb", "wrd", "wre", "wrg", "wrh",
    "wri", "wrk", "wrl", "wrm", "wrn", "wro", "wrp", "wrr", "wrs", "wru", "wrv", "wrw",
    "wrx", "wry", "wrz", "wsa", "wsg", "wsi", "wsk", "wsr", "wss", "wsu", "wsv", "wtb",
    "wtf", "wth", "wti", "wtk", "wtm", "wtw", "wua", "wub", "wud", "wuh", "wul", "wum",
    "wun", "wur", "wut", "wuu", "wuv", "wux", "wuy", "wwa", "wwb", "wwo", "wwr", "www",
    "wxa", "wxw", "wya", "wyb", "wyi", "wym", "wyn", "wyr", "wyy", "xaa", "xab", "xac",
    "xad", "xae", "xag", "xah", "xai", "xaj", "xak", "xal", "xam", "xan", "xao", "xap",
    "xaq", "xar", "xas", "xat", "xau", "xav", "xaw", "xay", "xba", "xbb", "xbc", "xbd",
    "xbe", "xbg", "xbi", "xbj", "xbm", "xbn", "xbo", "xbp", "xbr", "xbw", "xbx", "xby",
    "xcb", "xcc", "xce", "xcg", "xch", "xcl", "xcm", "xcn", "xco", "xcr", "xct", "xcu",
    "xcv", "xcw", "xcy", "xda", "xdc", "xdk", "xdm", "xdo", "xdq", "xdy", "xeb", "xed",
    "xeg", "xel", "xem", "xep", "xer", "xes", "xet", "xeu", "xfa", "xga", "xgb", "xgd",
    "xgf", "xgg", "xgi", "xgl", "xgm", "xgr", "xgu", "xgw", "xha", "xhc", "xhd", "xhe",
    "xhm", "xho", "xhr", "xht", "xhu", "xhv", "xia", "xib", "xii", "xil", "xin", "xip",
    "xir", "xis", "xiv", "xiy", "xjb", "xjt", "xka", "xkb", "xkc", "xkd", "xke", "xkf",
    "xkg", "xkh", "xki", "xkj", "xkk", "xkl", "xkm", "xkn", "xko", "xkp", "xkq", "xkr",
    "xks", "xkt", "xku", "xkv", "xkw", "xkx", "xky", "xkz", "xla", "xlb", "xlc", "xld",
    "xle", "xlg", "xli", "xln", "xlo", "xlp", "xls", "xlu", "xly", "xma", "xmb", "xmc",
    "xmd", "xme", "xmf", "xmg", "xmh", "xmi", "xmj", "xmk", "xml", "xmm", "xmn", "xmo",
    "xmp", "xmq", "xmr", "xms", "xmt", "xmu", "xmv", "xmw", "xmx", "xmy", "xmz", "xna",
    "xnb", "xng", "xnh", "xni", "xnj", "xnk", "xnm", "xnn", "xno", "xnq", "xnr", "xns",
    "xnt", "xnu", "xny", "xnz", "xoc", "xod", "xog", "xoi", "xok", "xom", "xon", "xoo",
    "xop", "xor", "xow", "xpa", "xpb", "xpc", "xpd", "xpe", "xpf", "xpg", "xph", "xpi",
    "xpj", "xpk", "xpl", "xpm", "xpn", "xpo", "xpp", "xpq", "xpr", "xps", "xpt", "xpu",
    "xpv", "xpw", "xpx", "xpy", "xpz", "xqa", "xqt", "xra", "xrb", "xrd", "xre", "xrg",
    "xri", "xrm", "xrn", "xrq", "xrr", "xrt", "xru", "xrw", "xsa", "xsb", "xsc", "xsd",
    "xse", "xsh", "xsi", "xsj", "xsk", "xsl", "xsm", "xsn", "xso", "xsp", "xsq", "xsr",
    "xss", "xst", "xsu", "xsv", "xsy", "xta", "xtb", "xtc", "xtd", "xte", "xtg", "xth",
    "xti", "xtj", "xtl", "xtm", "xtn", "xto", "xtp", "xtq", "xtr", "xts", "xtt", "xtu",
    "xtv", "xtw", "xty", "xtz", "xua", "xub", "xud", "xuf", "xug", "xuj", "xul", "xum",
    "xun", "xuo", "xup", "xur", "xut", "xuu", "xve", "xvi", "xvn", "xvo", "xvs", "xwa",
    "xwc", "xwd", "xwe", "xwg", "xwj", "xwk", "xwl", "xwo", "xwr", "xwt", "xww", "xxb",
    "xxk", "xxm", "xxr", "xxt", "xya", "xyb", "xyj", "xyk", "xyl", "xyt", "xyy", "xzh",
    "xzm", "xzp", "yaa", "yab", "yac", "yad", "yae", "yaf", "yag", "yah", "yai", "yaj",
    "yak", "yal", "yam", "yan", "yao", "yap", "yaq", "yar", "yas", "yat", "yau", "yav",
    "yaw", "yax", "yay", "yaz", "yba", "ybb", "ybd", "ybe", "ybh", "ybi", "ybj", "ybk",
    "ybl", "ybm", "ybn", "ybo", "ybx", "yby", "ych", "ycl", "ycn", "ycp", "ycr", "yda",
    "ydd", "yde", "ydg", "ydk", "yds", "yea", "yec", "yee", "yei", "yej", "yel", "yen",
    "yer", "yes", "yet", "yeu", "yev", "yey", "yga", "ygi", "ygl", "ygm", "ygp", "ygr",
    "ygs", "ygu", "ygw", "yha", "yhd", "yhl", "yhs", "yia", "yib", "yid", "yif", "yig",
    "yih", "yii", "yij", "yik", "yil", "yim", "yin", "yio", "yip", "yiq", "yir", "yis",
    "yit", "yiu", "yiv", "yix", "yiy", "yiz", "yka", "ykg", "ykh", "yki", "ykk", "ykl",
    "ykm", "ykn", "yko", "ykr", "ykt", "yku", "yky", "yla", "ylb", "yle", "ylg", "yli",
    "yll", "ylm", "yln", "ylo", "ylr", "ylu", "yly", "yma", "ymb", "ymc", "ymd", "yme",
    "ymg", "ymh", "ymi", "ymj", "ymk", "yml", "ymm", "ymn", "ymo", "ymp", "ymq", "ymr",
    "yms", "ymt", "ymx", "ymz", "yna", "ynb", "ynd", "yne", "yng", "ynh", "ynk", "ynl",
    "ynn", "yno", "ynq", "yns", "ynu", "yob", "yog", "yoi", "yok", "yol", "yom", "yon",
    "yor", "yos", "yot", "yox", "yoy", "ypa", "ypb", "ypg", "yph", "ypl", "ypm", "ypn",
    "ypo", "ypp", "ypw", "ypz", "yra", "yrb", "yre", "yri", "yrk", "yrl", "yrm", "yrn",
    "yro", "yrs", "yrw", "yry", "ysc", "ysd", "ysg", "ysl", "ysm", "ysn", "yso", "ysp",
    "ysr", "yss", "ysy", "yta", "ytl", "ytp", "ytw", "yty", "yua", "yub", "yuc", "yud",
    "yue", "yuf", "yug", "yui", "yuj", "yuk", "yul", "yum", "yun", "yup", "yuq", "yur",
    "yus", "yut", "yuu", "yuw", "yux", "yuy", "yuz", "yva", "yvt", "ywa", "ywg", "ywl",
    "ywm", "ywn", "ywq", "ywr", "ywt", "ywu", "yww", "yxa", "yxg", "yxl", "yxm", "yxu",
    "yxy", "yym", "yyr", "yyu", "yyz", "yzg", "yzk", "zaa", "zab", "zac", "zad", "zae",
    "zaf", "zag", "zah", "zai", "zaj", "zak", "zal", "zam", "zao", "zap", "zaq", "zar",
    "zas", "zat", "zau", "zav", "zaw", "zax", "zay", "zaz", "zba", "zbc", "zbe", "zbl",
    "zbt", "zbu", "zbw", "zca", "zcd", "zch", "zdj", "zea", "zeg", "zeh", "zem", "zen",
    "zga", "zgb", "zgh", "zgm", "zgn", "zgr", "zha", "zhb", "zhd", "zhi", "zhn", "zho",
    "zhw", "zia", "zib", "zik", "zil", "zim", "zin", "zir", "ziw", "ziz", "zka", "zkb",
    "zkd", "zkg", "zkh", "zkk", "zkn", "zko", "zkp", "zkr", "zkt", "zku", "zkv", "zkz",
    "zla", "zlj", "zlm", "zln", "zlq", "zlu", "zma", "zmb", "zmc", "zmd", "zme", "zmf",
    "zmg", "zmh", "zmi", "zmj", "zmk", "zml", "zmm", "zmn", "zmo", "zmp", "zmq", "zmr",
    "zms", "zmt", "zmu", "zmv", "zmw", "zmx", "zmy", "zmz", "zna", "zne", "zng", "znk",
    "zns", "zoc", "zoh", "zom", "zoo", "zoq", "zor", "zos", "zpa", "zpb", "zpc", "zpd",
    "zpe", "zpf", "zpg", "zph", "zpi", "zpj", "zpk", "zpl", "zpm", "zpn", "zpo", "zpp",
    "zpq", "zpr", "zps", "zpt", "zpu", "zpv", "zpw", "zpx", "zpy", "zpz", "zqe", "zra",
    "zrg", "zrn", "zro", "zrp", "zrs", "zsa", "zsk", "zsl", "zsm", "zsr", "zsu", "ztc",
    "zte", "ztg", "ztl", "ztm", "ztn", "ztp", "ztq", "zts", "ztt", "ztu", "ztx", "zty",
    "zua", "zuh", "zul", "zum", "zun", "zuy", "zwa", "zxx", "zyb", "zyg", "zyj", "zyn",
    "zyp", "zza", "zzj",
];
